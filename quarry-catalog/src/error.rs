use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Multiple database files share the name {0:?}")]
    DuplicateName(String),

    #[error("Could not read database file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not inspect database file {path}: {source}")]
    Sqlite {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl From<CatalogError> for quarry_common::CoreError {
    fn from(err: CatalogError) -> Self {
        quarry_common::CoreError::StartupError(err.to_string())
    }
}
