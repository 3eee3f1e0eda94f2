use std::collections::BTreeMap;

use crate::DatabaseEntry;

/// Read-only, boot-time mapping from logical database name to its
/// [`DatabaseEntry`]. Built once by [`crate::Inspector::scan`] and shared by
/// every request handler for the life of the process.
#[derive(Debug)]
pub struct Catalog {
    entries: BTreeMap<String, DatabaseEntry>,
}

impl Catalog {
    pub(crate) fn new(entries: BTreeMap<String, DatabaseEntry>) -> Self {
        Catalog { entries }
    }

    /// All entries, already sorted by name (a `BTreeMap` keeps that for free).
    pub fn list(&self) -> impl Iterator<Item = &DatabaseEntry> {
        self.entries.values()
    }

    pub fn lookup(&self, name: &str) -> Option<&DatabaseEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_common::Digest;
    use std::io::Write;
    use std::path::PathBuf;

    fn entry(name: &str) -> DatabaseEntry {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(name.as_bytes()).unwrap();
        DatabaseEntry {
            name: name.to_string(),
            digest: Digest::of_file(file.path()).unwrap(),
            file_path: PathBuf::from(format!("{name}.db")),
            tables: Default::default(),
        }
    }

    #[test]
    fn list_is_sorted_by_name() {
        let mut map = BTreeMap::new();
        map.insert("zebra".to_string(), entry("zebra"));
        map.insert("alpha".to_string(), entry("alpha"));
        let catalog = Catalog::new(map);
        let names: Vec<_> = catalog.list().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zebra"]);
    }

    #[test]
    fn lookup_missing_returns_none() {
        let catalog = Catalog::new(BTreeMap::new());
        assert!(catalog.lookup("missing").is_none());
    }
}
