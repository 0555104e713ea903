//! Binary asset storage consumed by the catalog.
//!
//! # Responsibility
//! - Define the blob-store contract used for character sprites.
//! - Provide a filesystem-backed implementation.
//!
//! # Invariants
//! - Asset names are generated by the store, never chosen by callers.
//! - `delete` of a missing asset reports `false` instead of failing.

mod fs_store;

pub use fs_store::FsAssetStore;

use thiserror::Error;

pub type AssetResult<T> = Result<T, AssetError>;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset payload is empty")]
    EmptyPayload,
    #[error("invalid asset name `{0}`")]
    InvalidName(String),
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset I/O failed for `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Blob store addressed by store-generated names.
pub trait AssetStore {
    /// Stores `bytes` and returns the generated asset name.
    ///
    /// `original_name` only contributes its file extension.
    fn put(&self, bytes: &[u8], original_name: Option<&str>) -> AssetResult<String>;
    /// Checks an original file name without storing anything.
    ///
    /// A name accepted here is never the reason `put` fails.
    fn check_original_name(&self, _original_name: &str) -> AssetResult<()> {
        Ok(())
    }
    fn get(&self, name: &str) -> AssetResult<Vec<u8>>;
    /// Returns `false` when no asset with `name` exists.
    fn delete(&self, name: &str) -> AssetResult<bool>;
}

impl<T: AssetStore + ?Sized> AssetStore for &T {
    fn put(&self, bytes: &[u8], original_name: Option<&str>) -> AssetResult<String> {
        (**self).put(bytes, original_name)
    }

    fn check_original_name(&self, original_name: &str) -> AssetResult<()> {
        (**self).check_original_name(original_name)
    }

    fn get(&self, name: &str) -> AssetResult<Vec<u8>> {
        (**self).get(name)
    }

    fn delete(&self, name: &str) -> AssetResult<bool> {
        (**self).delete(name)
    }
}
