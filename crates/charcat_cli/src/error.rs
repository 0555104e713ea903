use charcat_core::{
    AssetError, CatalogError, ConfigError, DbError, LoggingError, QueryError, RepoError,
};
use thiserror::Error;

/// Errors that end a `charcat` invocation.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Storage error: {0}")]
    Repository(#[from] RepoError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid filter `{0}`; expected key=value")]
    FilterSyntax(String),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}
