//! # Chunkflow Protocol
//!
//! Data model shared by the workspace resolver, the snippet loader and the
//! import reconciler. Field names follow the camelCase JSON that snippet
//! authors write in `package.json` and `.chunkflow.config.json`.

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

mod outcome;

pub use outcome::LoadOutcome;

/// One module a snippet needs available in the target file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequiredImport {
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub named_exports: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_import: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_namespace: Option<String>,
}

impl RequiredImport {
    /// `import '<package>';`
    pub fn side_effect(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    /// `import { a, b } from '<package>';`
    pub fn named<I, S>(package_name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            package_name: package_name.into(),
            named_exports: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// `import Local from '<package>';`
    pub fn default_binding(package_name: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            default_import: Some(local.into()),
            ..Default::default()
        }
    }

    /// `import * as ns from '<package>';`
    pub fn namespace(package_name: impl Into<String>, ns: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            import_namespace: Some(ns.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_default(mut self, local: impl Into<String>) -> Self {
        self.default_import = Some(local.into());
        self
    }

    /// True when the import only needs the module to be evaluated.
    #[must_use]
    pub fn is_side_effect_only(&self) -> bool {
        self.import_namespace.is_none()
            && self.default_import.is_none()
            && self.named_exports.is_empty()
    }
}

/// A reusable code template published by a package.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Template text; may carry editor placeholder markers.
    #[serde(default, deserialize_with = "string_or_lines")]
    pub body: String,
    /// Comma-separated language-id matchers. Empty matches every language.
    #[serde(default, deserialize_with = "string_or_list")]
    pub scope: String,
    #[serde(default)]
    pub package: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_imports: Vec<RequiredImport>,
}

/// The `{ "snippets": [...] }` shape shared by every snippet source.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SnippetCollection {
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

impl SnippetCollection {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self { snippets }
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrLines {
    Text(String),
    Lines(Vec<String>),
}

fn string_or_lines<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrLines>::deserialize(deserializer)? {
        None => String::new(),
        Some(TextOrLines::Text(text)) => text,
        Some(TextOrLines::Lines(lines)) => lines.join("\n"),
    })
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrLines>::deserialize(deserializer)? {
        None => String::new(),
        Some(TextOrLines::Text(text)) => text,
        Some(TextOrLines::Lines(items)) => items.join(","),
    })
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snippet_reads_camel_case_fields() {
        let raw = r#"{
            "label": "Btn",
            "description": "A button",
            "body": "<Btn/>",
            "scope": "typescript,typescriptreact",
            "package": "ui",
            "requiredImports": [{ "packageName": "ui", "namedExports": ["Button"] }]
        }"#;
        let snippet: Snippet = serde_json::from_str(raw).unwrap();
        assert_eq!(snippet.scope, "typescript,typescriptreact");
        assert_eq!(
            snippet.required_imports,
            vec![RequiredImport::named("ui", ["Button"])]
        );
    }

    #[test]
    fn body_and_scope_accept_arrays() {
        let raw = r#"{
            "label": "Hook",
            "body": ["const [$1, set$1] = useState($2);", "$0"],
            "scope": ["typescriptreact", "javascriptreact"]
        }"#;
        let snippet: Snippet = serde_json::from_str(raw).unwrap();
        assert_eq!(snippet.body, "const [$1, set$1] = useState($2);\n$0");
        assert_eq!(snippet.scope, "typescriptreact,javascriptreact");
        assert!(snippet.package.is_empty());
        assert!(snippet.required_imports.is_empty());
    }

    #[test]
    fn null_scope_means_any_language() {
        let raw = r#"{ "label": "x", "body": "x", "scope": null }"#;
        let snippet: Snippet = serde_json::from_str(raw).unwrap();
        assert_eq!(snippet.scope, "");
    }

    #[test]
    fn missing_or_null_body_is_empty() {
        let snippets: SnippetCollection = serde_json::from_str(
            r#"{"snippets":[{"label":"a"},{"label":"b","body":null},{"label":"c","body":"c"}]}"#,
        )
        .unwrap();
        let bodies: Vec<_> = snippets.snippets.iter().map(|s| s.body.as_str()).collect();
        assert_eq!(bodies, vec!["", "", "c"]);
    }

    #[test]
    fn side_effect_only_detection() {
        assert!(RequiredImport::side_effect("polyfill").is_side_effect_only());
        assert!(!RequiredImport::named("ui", ["Button"]).is_side_effect_only());
        assert!(!RequiredImport::namespace("path", "path").is_side_effect_only());
        assert!(!RequiredImport::default_binding("react", "React").is_side_effect_only());
    }

    #[test]
    fn required_import_omits_empty_fields_when_serialized() {
        let json = serialize_json(&RequiredImport::default_binding("react", "React")).unwrap();
        assert_eq!(json, r#"{"packageName":"react","defaultImport":"React"}"#);
    }
}
