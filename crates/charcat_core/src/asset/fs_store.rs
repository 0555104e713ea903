//! Filesystem asset store.
//!
//! # Invariants
//! - Every stored file lives directly under `root`; names never contain path
//!   separators or `..`.
//! - Stored names are `<uuid-v4>[.<ext>]`, the extension taken from the
//!   caller's original file name when it is short and alphanumeric.

use super::{AssetError, AssetResult, AssetStore};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

static EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").expect("valid extension regex"));
static ASSET_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,254}$").expect("valid name regex"));

/// Asset store writing one file per asset under a root directory.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Opens (and creates when missing) the storage directory.
    pub fn open(root: impl AsRef<Path>) -> AssetResult<Self> {
        let root = root.as_ref();
        let display = root.display().to_string();
        fs::create_dir_all(root).map_err(|source| AssetError::Io {
            name: display.clone(),
            source,
        })?;
        let root = fs::canonicalize(root).map_err(|source| AssetError::Io {
            name: display,
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> AssetResult<PathBuf> {
        if name.contains("..") || !ASSET_NAME_RE.is_match(name) {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl AssetStore for FsAssetStore {
    fn put(&self, bytes: &[u8], original_name: Option<&str>) -> AssetResult<String> {
        if bytes.is_empty() {
            return Err(AssetError::EmptyPayload);
        }

        let extension = match original_name {
            Some(original) => sanitized_extension(original)?,
            None => None,
        };
        let name = match extension {
            Some(extension) => format!("{}.{extension}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        let path = self.resolve(&name)?;
        fs::write(&path, bytes).map_err(|source| AssetError::Io {
            name: name.clone(),
            source,
        })?;

        info!(
            "event=asset_put module=asset status=ok name={} bytes={}",
            name,
            bytes.len()
        );
        Ok(name)
    }

    fn check_original_name(&self, original_name: &str) -> AssetResult<()> {
        sanitized_extension(original_name).map(|_| ())
    }

    fn get(&self, name: &str) -> AssetResult<Vec<u8>> {
        let path = self.resolve(name)?;
        fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AssetError::NotFound(name.to_string()),
            _ => AssetError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    fn delete(&self, name: &str) -> AssetResult<bool> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("event=asset_delete module=asset status=ok name={name}");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=asset_delete module=asset status=missing name={name}");
                Ok(false)
            }
            Err(source) => Err(AssetError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

fn sanitized_extension(original_name: &str) -> AssetResult<Option<String>> {
    if original_name.contains("..") {
        return Err(AssetError::InvalidName(original_name.to_string()));
    }

    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let extension = match file_name.rfind('.') {
        Some(index) if index > 0 => &file_name[index + 1..],
        _ => return Ok(None),
    };

    if EXTENSION_RE.is_match(extension) {
        Ok(Some(extension.to_ascii_lowercase()))
    } else {
        Ok(None)
    }
}
