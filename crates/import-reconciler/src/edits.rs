use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single change to a source text, in byte offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TextEdit {
    Insert { offset: usize, text: String },
    Replace { start: usize, end: usize, text: String },
}

impl TextEdit {
    pub fn start(&self) -> usize {
        match self {
            TextEdit::Insert { offset, .. } => *offset,
            TextEdit::Replace { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            TextEdit::Insert { offset, .. } => *offset,
            TextEdit::Replace { end, .. } => *end,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TextEdit::Insert { text, .. } | TextEdit::Replace { text, .. } => text,
        }
    }
}

/// Edits computed against one exact version of a text.
///
/// The set is applied all at once or not at all; [`apply`](Self::apply)
/// refuses a text whose fingerprint differs from the one the edits were
/// computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSet {
    fingerprint: String,
    edits: Vec<TextEdit>,
}

impl EditSet {
    pub fn new(source: &str, edits: Vec<TextEdit>) -> Self {
        Self {
            fingerprint: fingerprint(source),
            edits,
        }
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Was this set computed against `text`?
    pub fn matches(&self, text: &str) -> bool {
        fingerprint(text) == self.fingerprint
    }

    /// Apply every edit to `text` and return the new text.
    ///
    /// Insertions at the same offset keep their order in the set, and an
    /// insertion at the start of a replaced range lands before the
    /// replacement.
    pub fn apply(&self, text: &str) -> Result<String> {
        let actual = fingerprint(text);
        if actual != self.fingerprint {
            return Err(ImportError::StaleEdits {
                expected: self.fingerprint.clone(),
                actual,
            });
        }

        let mut ordered: Vec<&TextEdit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (edit.start(), edit.end()));

        for edit in &ordered {
            let (start, end) = (edit.start(), edit.end());
            if start > end
                || end > text.len()
                || !text.is_char_boundary(start)
                || !text.is_char_boundary(end)
            {
                return Err(ImportError::InvalidRange {
                    start,
                    end,
                    len: text.len(),
                });
            }
        }
        for pair in ordered.windows(2) {
            if pair[0].end() > pair[1].start() {
                return Err(ImportError::OverlappingEdits {
                    first: (pair[0].start(), pair[0].end()),
                    second: (pair[1].start(), pair[1].end()),
                });
            }
        }

        let added: usize = ordered.iter().map(|edit| edit.text().len()).sum();
        let mut out = String::with_capacity(text.len() + added);
        let mut cursor = 0;
        for edit in ordered {
            out.push_str(&text[cursor..edit.start()]);
            out.push_str(edit.text());
            cursor = edit.end();
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }
}

/// Hex SHA-256 of `text`
pub fn fingerprint(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn insert(offset: usize, text: &str) -> TextEdit {
        TextEdit::Insert {
            offset,
            text: text.to_string(),
        }
    }

    fn replace(start: usize, end: usize, text: &str) -> TextEdit {
        TextEdit::Replace {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn applies_in_offset_order() {
        let source = "aaa bbb ccc";
        let set = EditSet::new(source, vec![replace(8, 11, "CCC"), insert(0, ">"), replace(0, 3, "A")]);
        assert_eq!(set.apply(source).expect("apply"), ">A bbb CCC");
    }

    #[test]
    fn same_offset_insertions_keep_order() {
        let source = "x";
        let set = EditSet::new(source, vec![insert(0, "1"), insert(0, "2"), insert(1, "3")]);
        assert_eq!(set.apply(source).expect("apply"), "12x3");
    }

    #[test]
    fn stale_text_is_refused() {
        let set = EditSet::new("before", vec![insert(0, "x")]);
        assert!(!set.matches("after"));
        assert!(matches!(set.apply("after"), Err(ImportError::StaleEdits { .. })));
    }

    #[test]
    fn overlapping_edits_are_refused() {
        let source = "abcdef";
        let set = EditSet::new(source, vec![replace(0, 4, "x"), replace(2, 6, "y")]);
        assert!(matches!(
            set.apply(source),
            Err(ImportError::OverlappingEdits {
                first: (0, 4),
                second: (2, 6)
            })
        ));

        let inside = EditSet::new(source, vec![replace(0, 4, "x"), insert(2, "y")]);
        assert!(inside.apply(source).is_err());
    }

    #[test]
    fn out_of_range_is_refused() {
        let source = "héllo";
        let set = EditSet::new(source, vec![insert(2, "x")]);
        assert!(matches!(set.apply(source), Err(ImportError::InvalidRange { .. })));
    }

    #[test]
    fn empty_set_returns_text_unchanged() {
        let set = EditSet::new("same", Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.apply("same").expect("apply"), "same");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(insert(3, "x")).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "insert", "offset": 3, "text": "x"}));
    }
}
