use crate::error::{Result, WorkspaceError};
use serde::{Deserialize, Serialize};

/// File names and directory rules used while resolving a workspace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Per-package project descriptor
    pub descriptor_file: String,

    /// Root-level file listing workspace globs (`packages:` + `- glob`)
    pub workspace_glob_file: String,

    /// Directory names never descended into when expanding member globs
    pub ignored_dirs: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            descriptor_file: "package.json".to_string(),
            workspace_glob_file: "pnpm-workspace.yaml".to_string(),
            ignored_dirs: vec!["node_modules".to_string()],
        }
    }
}

impl WorkspaceConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("descriptor_file", &self.descriptor_file),
            ("workspace_glob_file", &self.workspace_glob_file),
        ] {
            if value.trim().is_empty() {
                return Err(WorkspaceError::invalid_config(format!(
                    "{field} must not be empty"
                )));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(WorkspaceError::invalid_config(format!(
                    "{field} must be a bare file name, got '{value}'"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|dir| dir == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(WorkspaceConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_or_nested_file_names() {
        let config = WorkspaceConfig {
            descriptor_file: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkspaceConfig {
            workspace_glob_file: "config/pnpm-workspace.yaml".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: WorkspaceConfig =
            serde_json::from_str(r#"{"ignored_dirs": ["node_modules", "dist"]}"#).unwrap();
        assert_eq!(config.descriptor_file, "package.json");
        assert!(config.is_ignored_dir("dist"));
        assert!(!config.is_ignored_dir("src"));
    }
}
