//! Core domain logic for the character catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod asset;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use asset::{AssetError, AssetResult, AssetStore, FsAssetStore};
pub use config::{CatalogConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::character::{
    BaseStats, Character, CharacterId, CharacterType, CharacterValidationError, Classification,
    Stat,
};
pub use model::request::{CharacterInput, CharacterPatch, NewCharacter};
pub use model::view::{CharacterView, Page};
pub use query::filter::FilterSpec;
pub use query::page::{PageRequest, SortDirection, SortField};
pub use query::predicate::{CharacterPredicate, Clause};
pub use query::QueryError;
pub use repo::character_repo::{
    CharacterRepository, RepoError, RepoResult, SqliteCharacterRepository,
};
pub use service::catalog_service::{CatalogError, CatalogResult, CharacterCatalog};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
