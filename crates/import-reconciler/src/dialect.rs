use crate::error::{ImportError, Result};
use std::path::Path;

/// Grammar used to read a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDialect {
    /// JavaScript, including JSX
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceDialect {
    /// Detect dialect from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceDialect::JavaScript),
            "ts" | "mts" | "cts" => Some(SourceDialect::TypeScript),
            "tsx" => Some(SourceDialect::Tsx),
            _ => None,
        }
    }

    /// Detect dialect from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect dialect from an editor language id
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "javascript" | "javascriptreact" => Some(SourceDialect::JavaScript),
            "typescript" => Some(SourceDialect::TypeScript),
            "typescriptreact" => Some(SourceDialect::Tsx),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), but an error names the file
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::from_path(path)
            .ok_or_else(|| ImportError::unsupported_dialect(path.display().to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceDialect::JavaScript => "javascript",
            SourceDialect::TypeScript => "typescript",
            SourceDialect::Tsx => "tsx",
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            SourceDialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SourceDialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceDialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for SourceDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(SourceDialect::from_extension("js"), Some(SourceDialect::JavaScript));
        assert_eq!(SourceDialect::from_extension("JSX"), Some(SourceDialect::JavaScript));
        assert_eq!(SourceDialect::from_extension("mts"), Some(SourceDialect::TypeScript));
        assert_eq!(SourceDialect::from_extension("tsx"), Some(SourceDialect::Tsx));
        assert_eq!(SourceDialect::from_extension("rs"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            SourceDialect::from_path("src/App.tsx"),
            Some(SourceDialect::Tsx)
        );
        assert_eq!(SourceDialect::from_path("Makefile"), None);
        assert!(SourceDialect::for_path("README.md").is_err());
    }

    #[test]
    fn test_from_language_id() {
        assert_eq!(
            SourceDialect::from_language_id("javascriptreact"),
            Some(SourceDialect::JavaScript)
        );
        assert_eq!(
            SourceDialect::from_language_id("typescriptreact"),
            Some(SourceDialect::Tsx)
        );
        assert_eq!(SourceDialect::from_language_id("python"), None);
    }
}
