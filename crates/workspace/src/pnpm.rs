//! Recognizer for the one YAML shape workspace glob files are read for:
//!
//! ```yaml
//! packages:
//!   - 'packages/*'
//!   - apps/*
//!   - '!**/test/**'
//! ```
//!
//! Only a top-level `packages:` key followed by block list items is
//! understood. Flow sequences, anchors, nested keys and every other YAML
//! construct yield no globs rather than an error.

/// Extract the `packages:` list entries from `content`, in file order.
pub fn recognize_packages(content: &str) -> Vec<String> {
    let mut lines = content.lines();

    // Locate the top-level key. Indented `packages:` belongs to another map.
    loop {
        let Some(line) = lines.next() else {
            return Vec::new();
        };
        let without_comment = strip_comment(line);
        if without_comment.trim_end() == "packages:" {
            break;
        }
    }

    let mut globs = Vec::new();
    for line in lines {
        let trimmed = strip_comment(line).trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(item) = trimmed.strip_prefix('-') else {
            break;
        };
        if !item.is_empty() && !item.starts_with(char::is_whitespace) {
            // `-foo` is a scalar, not a list item
            break;
        }
        let value = unquote(item.trim());
        if !value.is_empty() {
            globs.push(value.to_string());
        }
    }
    globs
}

/// Drop a `#` comment that starts a line or follows whitespace. A `#` inside
/// a quoted scalar is kept.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev_is_space = true;
    for (idx, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == '#' && prev_is_space => return &line[..idx],
            None => {}
        }
        prev_is_space = ch.is_whitespace();
    }
    line
}

fn unquote(value: &str) -> &str {
    for q in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_block_list() {
        let yaml = "packages:\n  - packages/*\n  - apps/*\n";
        assert_eq!(recognize_packages(yaml), vec!["packages/*", "apps/*"]);
    }

    #[test]
    fn unquotes_and_keeps_exclusions() {
        let yaml = "packages:\n  - 'packages/*'\n  - \"tools/*\"\n  - '!**/test/**'\n";
        assert_eq!(
            recognize_packages(yaml),
            vec!["packages/*", "tools/*", "!**/test/**"]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let yaml = "# workspace\npackages: # members\n\n  # libraries\n  - libs/* # all libs\n\n  - apps/*\n";
        assert_eq!(recognize_packages(yaml), vec!["libs/*", "apps/*"]);
    }

    #[test]
    fn stops_at_next_key() {
        let yaml = "packages:\n  - libs/*\ncatalog:\n  react: ^18\n  - not-a-glob\n";
        assert_eq!(recognize_packages(yaml), vec!["libs/*"]);
    }

    #[test]
    fn list_items_at_column_zero_are_accepted() {
        let yaml = "packages:\n- libs/*\n- apps/*\n";
        assert_eq!(recognize_packages(yaml), vec!["libs/*", "apps/*"]);
    }

    #[test]
    fn unsupported_shapes_yield_nothing() {
        assert!(recognize_packages("packages: [libs/*, apps/*]\n").is_empty());
        assert!(recognize_packages("catalog:\n  packages:\n    - libs/*\n").is_empty());
        assert!(recognize_packages("onlyBuiltDependencies:\n  - esbuild\n").is_empty());
        assert!(recognize_packages("").is_empty());
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        let yaml = "packages:\n  - 'odd#dir/*'\n";
        assert_eq!(recognize_packages(yaml), vec!["odd#dir/*"]);
    }
}
