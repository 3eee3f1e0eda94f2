use quarry_catalog::{Catalog, DatabaseEntry};
use quarry_common::CoreError;

/// Output format selected by a path's trailing `.json` / `.jsono` suffix (or
/// its absence, meaning the rendered-HTML path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
    Jsono,
}

impl Format {
    pub fn is_json(self) -> bool {
        !matches!(self, Format::Html)
    }

    pub fn as_objects(self) -> bool {
        matches!(self, Format::Jsono)
    }
}

/// The fully decomposed request, the resolver's whole job per the core
/// contract: the outer HTTP layer hands over a raw path and query string,
/// and everything past that — which handler, which database, which table,
/// which row, which output format — is resolved here, since path segments
/// can carry extensions (`.json`, `.jsono`, `.db`) a plain segment router
/// can't disambiguate from legitimate name characters.
#[derive(Debug, Clone)]
pub enum Route {
    Index { format: Format },
    Database { db_slug: String, format: Format },
    DatabaseDownload { db_slug: String },
    Table { db_slug: String, table: String, format: Format },
    Row { db_slug: String, table: String, pk_path: String, format: Format },
}

/// Strips a recognized trailing suffix (`.jsono`, `.json`, `.db`) off the
/// final path segment and returns the bare stem alongside the format it
/// implies. A segment with none of these suffixes is the plain HTML route.
fn split_suffix(segment: &str) -> (&str, Option<&'static str>) {
    if let Some(stem) = segment.strip_suffix(".jsono") {
        (stem, Some("jsono"))
    } else if let Some(stem) = segment.strip_suffix(".json") {
        (stem, Some("json"))
    } else if let Some(stem) = segment.strip_suffix(".db") {
        (stem, Some("db"))
    } else {
        (segment, None)
    }
}

/// Parses a raw, already percent-decoded request path into a [`Route`].
/// Returns `None` for anything that doesn't match one of the five shapes in
/// the routing table (the caller turns that into a plain 404).
pub fn parse_path(path: &str) -> Option<Route> {
    let trimmed = path.trim_start_matches('/');
    let segments: Vec<&str> = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    };

    match segments.as_slice() {
        [] => Some(Route::Index { format: Format::Html }),
        [only] => {
            let (stem, suffix) = split_suffix(only);
            if stem.is_empty() {
                let format = match suffix {
                    Some("jsono") => Format::Jsono,
                    Some("json") | None => Format::Json,
                    _ => Format::Html,
                };
                Some(Route::Index { format })
            } else if suffix == Some("db") {
                Some(Route::DatabaseDownload { db_slug: stem.to_string() })
            } else {
                let format = match suffix {
                    Some("jsono") => Format::Jsono,
                    Some("json") => Format::Json,
                    _ => Format::Html,
                };
                Some(Route::Database { db_slug: stem.to_string(), format })
            }
        }
        [db_slug, table_segment] => {
            let (table, suffix) = split_suffix(table_segment);
            let format = match suffix {
                Some("jsono") => Format::Jsono,
                Some("json") => Format::Json,
                _ => Format::Html,
            };
            Some(Route::Table {
                db_slug: db_slug.to_string(),
                table: table.to_string(),
                format,
            })
        }
        [db_slug, table, pk_segment] => {
            let (pk_path, suffix) = split_suffix(pk_segment);
            let format = match suffix {
                Some("jsono") => Format::Jsono,
                Some("json") => Format::Json,
                _ => Format::Html,
            };
            Some(Route::Row {
                db_slug: db_slug.to_string(),
                table: table.to_string(),
                pk_path: pk_path.to_string(),
                format,
            })
        }
        _ => None,
    }
}

/// Result of resolving a `<db_slug>` against the catalog: either the slug
/// already names the canonical `<name>-<digest7>` pair, or it needs a 302 to
/// the canonical slug first.
pub enum Resolved<'a> {
    Canonical(&'a DatabaseEntry),
    Redirect { canonical_slug: String },
}

/// Resolves `slug` against `catalog` per §4.5: split on the final `-`;
/// if the name half isn't a known database, reinterpret the whole slug as
/// the name with no provided hash. A provided hash that doesn't match the
/// entry's short digest (including "no hash provided at all") yields a
/// redirect rather than an error — only an unknown name is a 404.
///
/// The split-on-last-hyphen heuristic is ambiguous exactly when a database
/// name itself ends in `-<7 hex chars>` that also happens to be a valid
/// name; this implementation, like the one it's drawn from, accepts that
/// edge case unresolved.
pub fn resolve_slug<'a>(catalog: &'a Catalog, slug: &str) -> Result<Resolved<'a>, CoreError> {
    let (name, provided_hash): (&str, Option<&str>) = match slug.rsplit_once('-') {
        Some((candidate_name, hash)) if catalog.contains(candidate_name) => {
            (candidate_name, Some(hash))
        }
        _ => (slug, None),
    };

    let entry = catalog
        .lookup(name)
        .ok_or_else(|| CoreError::NotFound(name.to_string()))?;

    let expected = entry.digest.short();
    match provided_hash {
        Some(hash) if hash == expected => Ok(Resolved::Canonical(entry)),
        _ => Ok(Resolved::Redirect { canonical_slug: entry.slug() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_variants() {
        assert!(matches!(parse_path(""), Some(Route::Index { format: Format::Html })));
        assert!(matches!(parse_path("/"), Some(Route::Index { format: Format::Html })));
        assert!(matches!(parse_path("/.json"), Some(Route::Index { format: Format::Json })));
        assert!(matches!(parse_path("/.jsono"), Some(Route::Index { format: Format::Jsono })));
    }

    #[test]
    fn parses_database_variants() {
        match parse_path("/fixtures-a1b2c3d").unwrap() {
            Route::Database { db_slug, format: Format::Html } => {
                assert_eq!(db_slug, "fixtures-a1b2c3d")
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse_path("/fixtures-a1b2c3d.json").unwrap() {
            Route::Database { db_slug, format: Format::Json } => {
                assert_eq!(db_slug, "fixtures-a1b2c3d")
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse_path("/fixtures-a1b2c3d.db").unwrap() {
            Route::DatabaseDownload { db_slug } => assert_eq!(db_slug, "fixtures-a1b2c3d"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_table_and_row() {
        match parse_path("/fixtures-a1b2c3d/widgets.json").unwrap() {
            Route::Table { db_slug, table, format: Format::Json } => {
                assert_eq!(db_slug, "fixtures-a1b2c3d");
                assert_eq!(table, "widgets");
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse_path("/fixtures-a1b2c3d/widgets/1.json").unwrap() {
            Route::Row { table, pk_path, format: Format::Json, .. } => {
                assert_eq!(table, "widgets");
                assert_eq!(pk_path, "1");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn four_segments_is_unmatched() {
        assert!(parse_path("/a/b/c/d").is_none());
    }
}
