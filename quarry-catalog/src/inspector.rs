use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quarry_common::Digest;
use rusqlite::{Connection, OpenFlags};

use crate::{Catalog, CatalogError, DatabaseEntry};

/// One-shot startup scan: opens each database file read-only, enumerates its
/// tables and their row counts, and computes its content digest. The handles
/// opened here are scratch-only and are dropped before the server starts
/// accepting requests; the [`crate::Catalog`] it produces is the only thing
/// that survives.
pub struct Inspector;

impl Inspector {
    /// Builds a [`Catalog`] from a list of database file paths.
    ///
    /// Fails if two paths share a stem (logical name collision), or if any
    /// file cannot be opened or inspected.
    pub fn scan(paths: &[PathBuf]) -> Result<Catalog, CatalogError> {
        let mut entries = BTreeMap::new();
        for path in paths {
            let entry = Self::scan_one(path)?;
            if entries.contains_key(&entry.name) {
                return Err(CatalogError::DuplicateName(entry.name));
            }
            entries.insert(entry.name.clone(), entry);
        }
        Ok(Catalog::new(entries))
    }

    fn scan_one(path: &Path) -> Result<DatabaseEntry, CatalogError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        tracing::info!(database = %name, path = %path.display(), "inspecting database file");

        let digest = Digest::of_file(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let conn = open_immutable(path).map_err(|source| CatalogError::Sqlite {
            path: path.display().to_string(),
            source,
        })?;

        let tables = list_tables_with_counts(&conn).map_err(|source| CatalogError::Sqlite {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(
            database = %name,
            digest = %digest,
            tables = tables.len(),
            "database inspected"
        );

        Ok(DatabaseEntry {
            name,
            digest,
            file_path: path.to_path_buf(),
            tables,
        })
    }
}

/// Opens `path` in SQLite's "immutable" mode: read-only, no locking, and
/// aggressive read-only query planning. Used both for the startup scan and,
/// lazily, by each pool worker.
pub fn open_immutable(path: &Path) -> rusqlite::Result<Connection> {
    let uri = format!("file:{}?immutable=1", path.display());
    Connection::open_with_flags(
        uri,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
    )
}

fn list_tables_with_counts(conn: &Connection) -> rusqlite::Result<BTreeMap<String, i64>> {
    let mut stmt =
        conn.prepare("select name from sqlite_master where type = 'table' order by name")?;
    let names: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    let mut tables = BTreeMap::new();
    for name in names {
        let count: i64 = conn.query_row(
            &format!("select count(*) from \"{}\"", name.replace('"', "\"\"")),
            [],
            |row| row.get(0),
        )?;
        tables.insert(name, count);
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_fixture() -> tempfile::TempPath {
        let file = tempfile::Builder::new()
            .suffix(".db")
            .tempfile()
            .unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "create table widgets (id integer primary key, name text);
             insert into widgets (name) values ('a'), ('b'), ('c');",
        )
        .unwrap();
        drop(conn);
        file.into_temp_path()
    }

    #[test]
    fn scans_tables_and_row_counts() {
        let fixture = make_fixture();
        let catalog = Inspector::scan(&[fixture.to_path_buf()]).unwrap();
        let name = fixture.file_stem().unwrap().to_string_lossy().into_owned();
        let entry = catalog.lookup(&name).unwrap();
        assert_eq!(entry.tables.get("widgets"), Some(&3));
        assert_eq!(entry.digest.short().len(), 7);
    }

    #[test]
    fn rejects_duplicate_stems() {
        let a = make_fixture();
        let dir = tempfile::tempdir().unwrap();
        let stem = a.file_stem().unwrap().to_owned();
        let b_path = dir.path().join(&stem).with_extension("db");
        std::fs::copy(&a, &b_path).unwrap();

        let err = Inspector::scan(&[a.to_path_buf(), b_path]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }
}
