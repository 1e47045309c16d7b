use crate::script::ScriptEvaluator;
use chunkflow_protocol::{LoadOutcome, Snippet, SnippetCollection};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One place a package may publish snippets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetSource {
    /// `{ "snippets": [...] }` JSON file
    JsonFile(PathBuf),
    /// Script module exporting `{ snippets }` through a default or named export
    ScriptModule(PathBuf),
    /// `snippets` field of the package's own descriptor
    DescriptorField(PathBuf),
}

impl SnippetSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::JsonFile(path) | Self::ScriptModule(path) | Self::DescriptorField(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::JsonFile(_) => "json",
            Self::ScriptModule(_) => "script",
            Self::DescriptorField(_) => "descriptor",
        }
    }

    pub async fn load(&self, evaluator: &dyn ScriptEvaluator) -> LoadOutcome<SnippetCollection> {
        let path = self.path();
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return LoadOutcome::NotPresent,
            Err(err) => {
                return LoadOutcome::malformed(format!("failed to read {}: {err}", path.display()))
            }
        };

        match self {
            Self::JsonFile(_) => parse_json_file(path, &content),
            Self::ScriptModule(_) => parse_script(path, &content, evaluator),
            Self::DescriptorField(_) => parse_descriptor_field(path, &content),
        }
    }
}

fn parse_json_file(path: &Path, content: &str) -> LoadOutcome<SnippetCollection> {
    if content.trim().is_empty() {
        return LoadOutcome::NotPresent;
    }
    serde_json::from_str::<SnippetCollection>(content).map_or_else(
        |err| LoadOutcome::malformed(format!("failed to parse {}: {err}", path.display())),
        LoadOutcome::Found,
    )
}

fn parse_script(
    path: &Path,
    content: &str,
    evaluator: &dyn ScriptEvaluator,
) -> LoadOutcome<SnippetCollection> {
    let exports = match evaluator.evaluate(content) {
        Ok(exports) => exports,
        Err(err) => {
            return LoadOutcome::malformed(format!("failed to read {}: {err}", path.display()))
        }
    };

    // A script that exists but exports no usable list still counts as found.
    match exports.snippets_value() {
        Some(value @ Value::Array(_)) => snippets_from_value(path, value.clone()),
        _ => LoadOutcome::Found(SnippetCollection::default()),
    }
}

fn parse_descriptor_field(path: &Path, content: &str) -> LoadOutcome<SnippetCollection> {
    let descriptor: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(err) => {
            return LoadOutcome::malformed(format!("failed to parse {}: {err}", path.display()))
        }
    };
    match descriptor.get("snippets") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => LoadOutcome::NotPresent,
        Some(value) => snippets_from_value(path, value.clone()),
    }
}

fn snippets_from_value(path: &Path, value: Value) -> LoadOutcome<SnippetCollection> {
    serde_json::from_value::<Vec<Snippet>>(value).map_or_else(
        |err| LoadOutcome::malformed(format!("invalid snippets in {}: {err}", path.display())),
        |snippets| LoadOutcome::Found(SnippetCollection::new(snippets)),
    )
}
