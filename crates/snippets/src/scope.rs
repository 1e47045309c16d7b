use chunkflow_protocol::Snippet;
use regex::Regex;

/// Does a snippet's `scope` apply to a file of `language_id`?
///
/// `scope` is a comma-separated list of matchers. Each trimmed matcher is a
/// regular expression searched anywhere in the language id, so `typescript`
/// also matches `typescriptreact`. A matcher that is not a valid expression
/// is compared as a plain substring. An empty scope matches every language.
pub fn matches_scope(scope: &str, language_id: &str) -> bool {
    if scope.is_empty() {
        return true;
    }
    scope.split(',').map(str::trim).any(|matcher| {
        match Regex::new(matcher) {
            Ok(re) => re.is_match(language_id),
            Err(err) => {
                log::debug!("scope matcher '{matcher}' is not a regex ({err}); using substring");
                language_id.contains(matcher)
            }
        }
    })
}

/// Keep the snippets whose scope applies to `language_id`, in order.
pub fn filter_by_scope(snippets: Vec<Snippet>, language_id: &str) -> Vec<Snippet> {
    snippets
        .into_iter()
        .filter(|snippet| matches_scope(&snippet.scope, language_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(label: &str, scope: &str) -> Snippet {
        Snippet {
            label: label.to_string(),
            description: String::new(),
            body: String::new(),
            scope: scope.to_string(),
            package: String::new(),
            required_imports: Vec::new(),
        }
    }

    #[test]
    fn empty_scope_matches_anything() {
        assert!(matches_scope("", "rust"));
    }

    #[test]
    fn comma_separated_matchers() {
        assert!(matches_scope("javascript, typescript", "typescript"));
        assert!(matches_scope("javascript,typescript", "javascript"));
        assert!(!matches_scope("javascript,typescript", "python"));
    }

    #[test]
    fn matchers_search_within_the_language_id() {
        assert!(matches_scope("typescript", "typescriptreact"));
        assert!(matches_scope("react$", "javascriptreact"));
        assert!(!matches_scope("^typescript$", "typescriptreact"));
    }

    #[test]
    fn invalid_regex_falls_back_to_substring() {
        assert!(matches_scope("c++(", "c++("));
        assert!(!matches_scope("c++(", "cpp"));
    }

    #[test]
    fn filter_preserves_order() {
        let filtered = filter_by_scope(
            vec![
                snippet("a", "typescript"),
                snippet("b", "python"),
                snippet("c", ""),
            ],
            "typescriptreact",
        );
        let labels: Vec<_> = filtered.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c"]);
    }
}
