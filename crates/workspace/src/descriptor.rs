use chunkflow_protocol::LoadOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Metadata of one package discovered in the workspace.
///
/// Built once during resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    name: String,
    version: String,
    root_path: PathBuf,
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>, root_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root_path,
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.dependencies
    }

    pub fn dev_dependencies(&self) -> &BTreeMap<String, String> {
        &self.dev_dependencies
    }

    /// True when `name` appears in either dependency table
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

/// `package.json` as read from disk, before it is bound to a directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    /// Either an array of globs or an object carrying `packages`
    #[serde(default)]
    pub workspaces: Option<Value>,
}

impl RawDescriptor {
    /// Globs declared through the native `workspaces` field.
    ///
    /// Non-string entries and any other shape of the field are ignored.
    pub fn workspace_globs(&self) -> Vec<String> {
        let list = match &self.workspaces {
            Some(Value::Array(items)) => items,
            Some(Value::Object(map)) => match map.get("packages") {
                Some(Value::Array(items)) => items,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        list.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }

    /// Bind the descriptor to the directory it was read from.
    ///
    /// Returns `None` when the descriptor has no usable `name`, since the
    /// store is keyed by it.
    pub fn into_descriptor(self, root_path: PathBuf) -> Option<PackageDescriptor> {
        let name = self.name.filter(|name| !name.trim().is_empty())?;
        Some(PackageDescriptor {
            name,
            version: self.version.unwrap_or_default(),
            root_path,
            dependencies: self.dependencies,
            dev_dependencies: self.dev_dependencies,
        })
    }
}

/// Read and parse `<dir>/<file_name>`.
pub async fn read_descriptor(dir: &Path, file_name: &str) -> LoadOutcome<RawDescriptor> {
    let path = dir.join(file_name);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return LoadOutcome::NotPresent,
        Err(err) => {
            return LoadOutcome::malformed(format!("failed to read {}: {err}", path.display()))
        }
    };

    match serde_json::from_str::<RawDescriptor>(&content) {
        Ok(raw) => LoadOutcome::Found(raw),
        Err(err) => LoadOutcome::malformed(format!("failed to parse {}: {err}", path.display())),
    }
}
