use crate::config::WorkspaceConfig;
use crate::descriptor::read_descriptor;
use chunkflow_protocol::LoadOutcome;
use std::path::{Path, PathBuf};

/// Find the workspace root that owns `start` (a file or directory).
///
/// The outermost ancestor that declares workspace members (a `workspaces`
/// field or a workspace glob file) wins; otherwise the nearest ancestor with a
/// descriptor. `None` when `start` belongs to no package at all.
pub async fn locate_workspace_root(start: &Path, config: &WorkspaceConfig) -> Option<PathBuf> {
    let start = match tokio::fs::canonicalize(start).await {
        Ok(path) => path,
        Err(err) => {
            log::debug!("Cannot resolve {}: {err}", start.display());
            return None;
        }
    };
    let first_dir = if is_dir(&start).await {
        start.as_path()
    } else {
        start.parent()?
    };

    let mut nearest: Option<PathBuf> = None;
    let mut outermost_workspace: Option<PathBuf> = None;

    for dir in first_dir.ancestors() {
        let declares_members = is_file(&dir.join(&config.workspace_glob_file)).await;
        match read_descriptor(dir, &config.descriptor_file).await {
            LoadOutcome::Found(raw) => {
                if nearest.is_none() {
                    nearest = Some(dir.to_path_buf());
                }
                if declares_members || !raw.workspace_globs().is_empty() {
                    outermost_workspace = Some(dir.to_path_buf());
                }
            }
            LoadOutcome::Malformed(diagnostic) => {
                log::debug!("Ignoring descriptor while locating root: {diagnostic}");
                if declares_members {
                    outermost_workspace = Some(dir.to_path_buf());
                }
            }
            LoadOutcome::NotPresent => {
                if declares_members {
                    outermost_workspace = Some(dir.to_path_buf());
                }
            }
        }
    }

    outermost_workspace.or(nearest)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
