use crate::config::LoaderConfig;
use crate::script::{ScriptEvaluator, StaticScriptEvaluator};
use crate::source::SnippetSource;
use chunkflow_protocol::{LoadOutcome, SnippetCollection};
use std::path::Path;
use std::sync::Arc;

/// Best-effort snippet discovery for a single package root
#[derive(Clone)]
pub struct SnippetLoader {
    config: LoaderConfig,
    evaluator: Arc<dyn ScriptEvaluator>,
}

impl std::fmt::Debug for SnippetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for SnippetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl SnippetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_evaluator(config, Arc::new(StaticScriptEvaluator))
    }

    /// Use a custom provider for script configs
    pub fn with_evaluator(config: LoaderConfig, evaluator: Arc<dyn ScriptEvaluator>) -> Self {
        Self { config, evaluator }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Candidate sources for `package_root`, highest priority first
    pub fn sources(&self, package_root: &Path) -> [SnippetSource; 3] {
        [
            SnippetSource::JsonFile(package_root.join(&self.config.json_file)),
            SnippetSource::ScriptModule(package_root.join(&self.config.script_file)),
            SnippetSource::DescriptorField(package_root.join(&self.config.descriptor_file)),
        ]
    }

    /// First source that yields content wins. Malformed sources are logged
    /// and skipped; `None` means the package publishes no snippets.
    pub async fn load(&self, package_root: &Path) -> Option<SnippetCollection> {
        for source in self.sources(package_root) {
            match source.load(self.evaluator.as_ref()).await {
                LoadOutcome::Found(collection) => {
                    log::debug!(
                        "Loaded {} snippets from {} ({})",
                        collection.len(),
                        source.path().display(),
                        source.kind()
                    );
                    return Some(collection);
                }
                LoadOutcome::NotPresent => {}
                LoadOutcome::Malformed(diagnostic) => {
                    log::warn!("Ignoring {} snippet source: {diagnostic}", source.kind());
                }
            }
        }
        None
    }
}
