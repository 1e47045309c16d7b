use crate::config::SessionConfig;
use crate::loader::SnippetLoader;
use chunkflow_protocol::SnippetCollection;
use chunkflow_workspace::{PackageStore, WorkspaceResolver};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const WORKSPACE_CACHE_KEY: &str = "_workspace";

/// A resolved workspace, owned by the caller for the length of an editing
/// session.
///
/// The package store is built once in [`open`](Self::open) and is not
/// invalidated by filesystem changes; call [`refresh`](Self::refresh) to
/// resolve again.
#[derive(Debug)]
pub struct WorkspaceSession {
    root: PathBuf,
    config: SessionConfig,
    resolver: WorkspaceResolver,
    loader: SnippetLoader,
    store: PackageStore,
    cache: Mutex<HashMap<String, Option<SnippetCollection>>>,
}

impl WorkspaceSession {
    pub async fn open(root: impl Into<PathBuf>, config: SessionConfig) -> Self {
        let loader = SnippetLoader::new(config.loader.clone());
        Self::open_with_loader(root, config, loader).await
    }

    /// Open with a pre-built loader (e.g. a custom script evaluator)
    pub async fn open_with_loader(
        root: impl Into<PathBuf>,
        config: SessionConfig,
        loader: SnippetLoader,
    ) -> Self {
        let root = root.into();
        let resolver = WorkspaceResolver::new(config.workspace.clone());
        let store = resolver.resolve(&root).await;
        Self {
            root,
            config,
            resolver,
            loader,
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &PackageStore {
        &self.store
    }

    /// Re-resolve the workspace and drop cached snippets
    pub async fn refresh(&mut self) {
        self.store = self.resolver.resolve(&self.root).await;
        self.clear_cache();
    }

    pub fn clear_cache(&self) {
        self.cache_guard().clear();
    }

    /// Snippets published by `package_name`, or by the whole workspace when
    /// no name is given.
    ///
    /// `None` means nothing was found anywhere; an aggregate result is never
    /// an empty collection. Scope filtering is left to the caller.
    pub async fn find_for_package(&self, package_name: Option<&str>) -> Option<SnippetCollection> {
        let key = package_name.unwrap_or(WORKSPACE_CACHE_KEY);
        if self.config.cache_snippets {
            if let Some(cached) = self.cache_guard().get(key) {
                return cached.clone();
            }
        }

        let found = match package_name {
            Some(name) => self.load_package(name).await,
            None => self.load_workspace().await,
        };

        if self.config.cache_snippets {
            self.cache_guard().insert(key.to_string(), found.clone());
        }
        found
    }

    async fn load_package(&self, name: &str) -> Option<SnippetCollection> {
        if let Some(path) = self.store.package_path(name) {
            return self.loader.load(path).await;
        }
        let external = self
            .root
            .join(&self.config.loader.external_dir)
            .join(name);
        log::debug!("'{name}' is not a workspace member; trying {}", external.display());
        self.loader.load(&external).await
    }

    async fn load_workspace(&self) -> Option<SnippetCollection> {
        let mut snippets = Vec::new();

        if let Some(root) = self.loader.load(&self.root).await {
            snippets.extend(root.snippets);
        }
        for pkg in self.store.iter() {
            // A single-package workspace registers the root itself.
            if same_dir(pkg.root_path(), &self.root) {
                continue;
            }
            if let Some(member) = self.loader.load(pkg.root_path()).await {
                snippets.extend(member.snippets);
            }
        }

        log::debug!(
            "Aggregated {} snippets across {} packages",
            snippets.len(),
            self.store.len()
        );
        (!snippets.is_empty()).then(|| SnippetCollection::new(snippets))
    }

    fn cache_guard(&self) -> MutexGuard<'_, HashMap<String, Option<SnippetCollection>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
