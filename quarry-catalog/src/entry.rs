use std::collections::BTreeMap;
use std::path::PathBuf;

use quarry_common::Digest;

/// Immutable record of one published database, built once by the [`crate::Inspector`]
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DatabaseEntry {
    /// Logical name derived from the file's stem, e.g. `fixtures` for `fixtures.db`.
    pub name: String,
    /// Full content digest of the file, computed at startup.
    pub digest: Digest,
    /// Path to the file on disk, as given on the command line.
    pub file_path: PathBuf,
    /// Table name to row count, as observed at startup.
    pub tables: BTreeMap<String, i64>,
}

impl DatabaseEntry {
    /// The canonical URL slug for this database version, e.g. `fixtures-a1b2c3d`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.name, self.digest.short())
    }

    pub fn table_rows(&self, table: &str) -> Option<i64> {
        self.tables.get(table).copied()
    }
}
