use crate::descriptor::PackageDescriptor;
use std::collections::HashMap;
use std::path::Path;

/// Every package known to a workspace, keyed by name.
///
/// Iteration follows first-registration order. Re-registering a name replaces
/// the descriptor in place, so the last writer wins without reordering.
#[derive(Debug, Clone, Default)]
pub struct PackageStore {
    packages: Vec<PackageDescriptor>,
    by_name: HashMap<String, usize>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, returning the one it replaced (if any).
    pub fn insert(&mut self, descriptor: PackageDescriptor) -> Option<PackageDescriptor> {
        match self.by_name.get(descriptor.name()) {
            Some(&idx) => Some(std::mem::replace(&mut self.packages[idx], descriptor)),
            None => {
                self.by_name
                    .insert(descriptor.name().to_string(), self.packages.len());
                self.packages.push(descriptor);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageDescriptor> {
        self.by_name.get(name).map(|&idx| &self.packages[idx])
    }

    /// Filesystem root of a workspace member
    pub fn package_path(&self, name: &str) -> Option<&Path> {
        self.get(name).map(PackageDescriptor::root_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(PackageDescriptor::name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Members that declare `name` as a dependency or dev dependency
    pub fn dependents_of(&self, name: &str) -> Vec<&PackageDescriptor> {
        self.packages
            .iter()
            .filter(|pkg| pkg.name() != name && pkg.depends_on(name))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PackageStore {
    type Item = &'a PackageDescriptor;
    type IntoIter = std::slice::Iter<'a, PackageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RawDescriptor;
    use std::path::PathBuf;

    fn pkg(json: &str, root: &str) -> PackageDescriptor {
        serde_json::from_str::<RawDescriptor>(json)
            .unwrap()
            .into_descriptor(PathBuf::from(root))
            .unwrap()
    }

    #[test]
    fn last_writer_wins_in_place() {
        let mut store = PackageStore::new();
        assert!(store.insert(pkg(r#"{"name":"a"}"#, "/r/a")).is_none());
        assert!(store.insert(pkg(r#"{"name":"b"}"#, "/r/b")).is_none());
        let replaced = store.insert(pkg(r#"{"name":"a","version":"2.0.0"}"#, "/r/a2"));

        assert_eq!(replaced.map(|d| d.root_path().to_path_buf()), Some(PathBuf::from("/r/a")));
        assert_eq!(store.len(), 2);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.package_path("a"), Some(Path::new("/r/a2")));
        assert_eq!(store.get("a").map(PackageDescriptor::version), Some("2.0.0"));
    }

    #[test]
    fn unknown_names_are_absent() {
        let store = PackageStore::new();
        assert!(store.is_empty());
        assert!(store.get("ui").is_none());
        assert!(store.package_path("ui").is_none());
        assert!(!store.contains("ui"));
    }

    #[test]
    fn dependents_cover_both_tables() {
        let mut store = PackageStore::new();
        store.insert(pkg(r#"{"name":"ui"}"#, "/r/ui"));
        store.insert(pkg(r#"{"name":"web","dependencies":{"ui":"*"}}"#, "/r/web"));
        store.insert(pkg(r#"{"name":"docs","devDependencies":{"ui":"*"}}"#, "/r/docs"));
        store.insert(pkg(r#"{"name":"api"}"#, "/r/api"));

        let names: Vec<_> = store.dependents_of("ui").into_iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["web", "docs"]);
    }
}
