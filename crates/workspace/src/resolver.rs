use crate::config::WorkspaceConfig;
use crate::descriptor::{read_descriptor, RawDescriptor};
use crate::error::{Result, WorkspaceError};
use crate::globs::WorkspaceGlobs;
use crate::pnpm::recognize_packages;
use crate::store::PackageStore;
use chunkflow_protocol::LoadOutcome;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Builds a [`PackageStore`] from a workspace root
#[derive(Debug, Clone, Default)]
pub struct WorkspaceResolver {
    config: WorkspaceConfig,
}

impl WorkspaceResolver {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Resolve every package reachable from `root`.
    ///
    /// Never fails: a missing or unreadable root descriptor yields an empty
    /// store, and member descriptors that cannot be read are skipped.
    pub async fn resolve(&self, root: &Path) -> PackageStore {
        let root = absolute_root(root).await;
        let mut store = PackageStore::new();

        let root_descriptor = match read_descriptor(&root, &self.config.descriptor_file).await {
            LoadOutcome::Found(raw) => raw,
            LoadOutcome::NotPresent => {
                log::debug!("No {} at {}", self.config.descriptor_file, root.display());
                return store;
            }
            LoadOutcome::Malformed(diagnostic) => {
                log::warn!("Ignoring workspace root: {diagnostic}");
                return store;
            }
        };

        let globs = self.collect_globs(&root, &root_descriptor).await;
        if globs.is_empty() {
            match root_descriptor.into_descriptor(root.clone()) {
                Some(descriptor) => {
                    log::debug!("Single-package workspace '{}'", descriptor.name());
                    store.insert(descriptor);
                }
                None => log::debug!("Root descriptor at {} has no name", root.display()),
            }
            return store;
        }

        let members = match self.member_dirs(&root, &globs).await {
            Ok(members) => members,
            Err(err) => {
                log::warn!("Failed to enumerate workspace members: {err}");
                return store;
            }
        };

        for dir in members {
            match read_descriptor(&dir, &self.config.descriptor_file).await {
                LoadOutcome::Found(raw) => match raw.into_descriptor(dir.clone()) {
                    Some(descriptor) => {
                        if let Some(previous) = store.insert(descriptor) {
                            log::warn!(
                                "Package name '{}' declared twice; {} replaces {}",
                                previous.name(),
                                dir.display(),
                                previous.root_path().display()
                            );
                        }
                    }
                    None => log::debug!("Skipping unnamed package at {}", dir.display()),
                },
                LoadOutcome::NotPresent => {}
                LoadOutcome::Malformed(diagnostic) => {
                    log::warn!("Skipping workspace member: {diagnostic}");
                }
            }
        }

        log::info!(
            "Resolved workspace {}: {} packages from {} globs",
            root.display(),
            store.len(),
            globs.include().len()
        );
        store
    }

    /// Gather member globs from the `workspaces` field (array or object form)
    /// followed by the workspace glob file.
    pub async fn collect_globs(&self, root: &Path, descriptor: &RawDescriptor) -> WorkspaceGlobs {
        let mut globs = WorkspaceGlobs::new();
        globs.extend(descriptor.workspace_globs());

        let glob_file = root.join(&self.config.workspace_glob_file);
        match tokio::fs::read_to_string(&glob_file).await {
            Ok(content) => globs.extend(recognize_packages(&content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => log::warn!("Failed to read {}: {err}", glob_file.display()),
        }

        globs
    }

    /// Directories holding a descriptor matched by `globs`, in glob
    /// declaration order and alphabetical order within one glob.
    pub async fn member_dirs(&self, root: &Path, globs: &WorkspaceGlobs) -> Result<Vec<PathBuf>> {
        let root = root.to_path_buf();
        let globs = globs.clone();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || expand_members(&root, &globs, &config))
            .await
            .map_err(|e| WorkspaceError::Task(e.to_string()))?
    }
}

fn expand_members(
    root: &Path,
    globs: &WorkspaceGlobs,
    config: &WorkspaceConfig,
) -> Result<Vec<PathBuf>> {
    let exclusions = globs.exclusion_matcher();
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut seen = HashSet::new();
    let mut members = Vec::new();

    for include in globs.include() {
        let pattern = format!(
            "{}/{}/{}",
            escaped_root.trim_end_matches('/'),
            include,
            config.descriptor_file
        );
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(err) => {
                log::warn!("{}", WorkspaceError::invalid_glob(include.as_str(), err));
                continue;
            }
        };

        let mut matched: Vec<PathBuf> = paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(err) => {
                    log::debug!("Unreadable path while expanding '{include}': {err}");
                    None
                }
            })
            .collect();
        matched.sort();

        for descriptor_path in matched {
            let Some(dir) = descriptor_path.parent() else {
                continue;
            };
            let rel_dir = relative_slash_path(root, dir);
            if crosses_ignored_dir(&rel_dir, config) {
                continue;
            }
            let rel_descriptor = format!("{rel_dir}/{}", config.descriptor_file);
            if exclusions.is_excluded(&rel_dir, &rel_descriptor) {
                log::debug!("Excluded workspace member {rel_dir}");
                continue;
            }
            if seen.insert(dir.to_path_buf()) {
                members.push(dir.to_path_buf());
            }
        }
    }

    Ok(members)
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn crosses_ignored_dir(rel_dir: &str, config: &WorkspaceConfig) -> bool {
    rel_dir.split('/').any(|part| config.is_ignored_dir(part))
}

async fn absolute_root(root: &Path) -> PathBuf {
    match tokio::fs::canonicalize(root).await {
        Ok(path) => path,
        Err(_) => std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_slash_path(root, Path::new("/repo/packages/ui")),
            "packages/ui"
        );
        assert_eq!(relative_slash_path(root, Path::new("/repo")), "");
    }

    #[test]
    fn ignored_dirs_anywhere_in_the_path() {
        let config = WorkspaceConfig::default();
        assert!(crosses_ignored_dir("packages/ui/node_modules/x", &config));
        assert!(!crosses_ignored_dir("packages/ui", &config));
    }
}
