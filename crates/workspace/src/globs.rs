use crate::error::WorkspaceError;
use glob::{MatchOptions, Pattern};
use serde::Serialize;

/// Member globs gathered from every workspace convention, in declaration
/// order. Entries starting with `!` are exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceGlobs {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl WorkspaceGlobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one raw entry. Duplicates keep their first position.
    pub fn push(&mut self, raw: &str) {
        let trimmed = raw.trim();
        let (list, glob) = match trimmed.strip_prefix('!') {
            Some(rest) => (&mut self.exclude, normalize(rest)),
            None => (&mut self.include, normalize(trimmed)),
        };
        if glob.is_empty() || list.iter().any(|existing| existing == &glob) {
            return;
        }
        list.push(glob);
    }

    pub fn extend<I, S>(&mut self, raw: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in raw {
            self.push(entry.as_ref());
        }
    }

    /// No inclusion globs means a single-package workspace.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Compile exclusions. An invalid pattern is logged and skipped; the
    /// remaining exclusions still apply.
    pub fn exclusion_matcher(&self) -> ExclusionMatcher {
        let patterns = self
            .exclude
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    log::warn!("{}", WorkspaceError::invalid_glob(glob.as_str(), err));
                    None
                }
            })
            .collect();
        ExclusionMatcher { patterns }
    }
}

/// Compiled `!glob` entries, matched against root-relative member paths.
#[derive(Debug, Default)]
pub struct ExclusionMatcher {
    patterns: Vec<Pattern>,
}

impl ExclusionMatcher {
    /// `member_dir` and `descriptor_path` are root-relative, `/`-separated.
    pub fn is_excluded(&self, member_dir: &str, descriptor_path: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns.iter().any(|pattern| {
            pattern.matches_with(member_dir, options)
                || pattern.matches_with(descriptor_path, options)
        })
    }
}

fn normalize(glob: &str) -> String {
    let mut value = glob.trim().replace('\\', "/");
    while let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    value.trim_end_matches('/').to_string()
}
