use crate::error::{Result, SnippetError};
use chunkflow_workspace::WorkspaceConfig;
use serde::{Deserialize, Serialize};

/// Where snippet sources live relative to a package root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Dedicated JSON snippet config, tried first
    pub json_file: String,

    /// Dedicated script snippet config, tried second
    pub script_file: String,

    /// Project descriptor whose `snippets` field is the last resort
    pub descriptor_file: String,

    /// Install directory for packages that are not workspace members
    pub external_dir: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            json_file: ".chunkflow.config.json".to_string(),
            script_file: ".chunkflow.config.js".to_string(),
            descriptor_file: "package.json".to_string(),
            external_dir: "node_modules".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("json_file", &self.json_file),
            ("script_file", &self.script_file),
            ("descriptor_file", &self.descriptor_file),
            ("external_dir", &self.external_dir),
        ] {
            if value.trim().is_empty() {
                return Err(SnippetError::invalid_config(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a [`WorkspaceSession`](crate::WorkspaceSession) needs to start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub workspace: WorkspaceConfig,
    pub loader: LoaderConfig,

    /// Keep loaded snippets per package until `refresh`/`clear_cache`
    pub cache_snippets: bool,
}

impl SessionConfig {
    /// Config with snippet caching enabled
    pub fn cached() -> Self {
        Self {
            cache_snippets: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.workspace
            .validate()
            .map_err(|e| SnippetError::invalid_config(e.to_string()))?;
        self.loader.validate()
    }
}
