mod packages;
mod reconcile;
mod snippets;

use crate::GlobalOptions;
use chunkflow_workspace::{locate_workspace_root, WorkspaceConfig};
use std::path::{Path, PathBuf};

pub(crate) use packages::run_packages;
pub(crate) use reconcile::run_reconcile;
pub(crate) use snippets::run_snippets;

/// Environment variable naming the workspace root
pub const ROOT_ENV: &str = "CHUNKFLOW_ROOT";

/// `--root`, then `CHUNKFLOW_ROOT`, then the workspace enclosing `start`.
///
/// Falls back to `start` itself; resolving a directory that is not a
/// workspace yields an empty store rather than an error.
pub(crate) async fn workspace_root(
    options: &GlobalOptions,
    start: &Path,
    config: &WorkspaceConfig,
) -> PathBuf {
    if let Some(root) = &options.root {
        return root.clone();
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }
    match locate_workspace_root(start, config).await {
        Some(root) => {
            log::debug!("Using workspace root {}", root.display());
            root
        }
        None => {
            log::info!(
                "No workspace found above {}; using it as the root",
                start.display()
            );
            start.to_path_buf()
        }
    }
}

pub(crate) fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
