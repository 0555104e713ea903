//! Character catalog use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete and sprite entry points for callers.
//! - Enforce character lifecycle invariants on top of the repository.
//! - Coordinate the character repository with the sprite asset store.
//!
//! # Invariants
//! - Soft-deleted characters surface as `NotFound` everywhere except
//!   `hard_delete`.
//! - Updates never overwrite `id`, `is_deleted` or `created_at`.
//! - Caller input is checked before the previous sprite is removed.
//! - A failed asset `put` aborts before any repository write.
//! - Removing the previous sprite is best-effort: failures are logged and
//!   ignored. This is the only swallowed error in the service.
//! - Hard delete leaves the sprite asset in place.

use crate::asset::{AssetError, AssetStore};
use crate::model::character::{Character, CharacterId, CharacterType};
use crate::model::request::{CharacterInput, CharacterPatch, NewCharacter};
use crate::model::view::{CharacterView, Page};
use crate::query::filter::FilterSpec;
use crate::query::page::PageRequest;
use crate::query::predicate::CharacterPredicate;
use crate::query::QueryError;
use crate::repo::character_repo::{CharacterRepository, RepoError};
use log::{debug, info, warn};
use thiserror::Error;

/// URL prefix under which stored sprites are served.
pub const SPRITE_URL_PREFIX: &str = "/uploads/";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error taxonomy surfaced to transport adapters.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Character id is absent or soft-deleted.
    #[error("character not found: {0}")]
    NotFound(CharacterId),
    /// Caller input was rejected before any write happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Character persistence failed.
    #[error("character storage failure: {0}")]
    Storage(#[source] RepoError),
    /// Sprite storage failed.
    #[error("asset storage failure: {0}")]
    Asset(#[source] AssetError),
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::InvalidInput(err.to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<QueryError> for CatalogError {
    fn from(value: QueryError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<AssetError> for CatalogError {
    fn from(value: AssetError) -> Self {
        match value {
            AssetError::EmptyPayload | AssetError::InvalidName(_) => {
                Self::InvalidInput(value.to_string())
            }
            other => Self::Asset(other),
        }
    }
}

/// Catalog facade over a character repository and a sprite asset store.
pub struct CharacterCatalog<R: CharacterRepository, A: AssetStore> {
    repo: R,
    assets: A,
}

impl<R: CharacterRepository, A: AssetStore> CharacterCatalog<R, A> {
    pub fn new(repo: R, assets: A) -> Self {
        Self { repo, assets }
    }

    /// Creates a character from caller input.
    ///
    /// # Contract
    /// - Unset stats take their creation defaults; unset `type` becomes NPC.
    /// - The new character is never tombstoned.
    pub fn create(&self, input: &CharacterInput) -> CatalogResult<CharacterView> {
        let draft = NewCharacter::from_input(input);
        let created = self.repo.insert(&draft)?;
        info!(
            "event=character_create module=catalog status=ok id={} type={}",
            created.id,
            created.kind.as_str()
        );
        Ok(created.into())
    }

    /// Creates a character with `forced_type` regardless of `input.character_type`.
    ///
    /// The caller's input is left untouched.
    pub fn create_as(
        &self,
        input: &CharacterInput,
        forced_type: CharacterType,
    ) -> CatalogResult<CharacterView> {
        let input = CharacterInput {
            character_type: Some(forced_type),
            ..input.clone()
        };
        self.create(&input)
    }

    pub fn create_hero(&self, input: &CharacterInput) -> CatalogResult<CharacterView> {
        self.create_as(input, CharacterType::Hero)
    }

    pub fn create_villain(&self, input: &CharacterInput) -> CatalogResult<CharacterView> {
        self.create_as(input, CharacterType::Villain)
    }

    /// Lists every visible character ordered by id.
    pub fn get_all(&self) -> CatalogResult<Vec<CharacterView>> {
        let characters = self.repo.find_all_visible()?;
        Ok(characters.into_iter().map(CharacterView::from).collect())
    }

    /// Lists one page of visible characters.
    pub fn get_page(&self, request: &PageRequest) -> CatalogResult<Page<CharacterView>> {
        let page = self
            .repo
            .find_visible_page(&CharacterPredicate::visible(), request)?;
        Ok(page.map(CharacterView::from))
    }

    /// Searches visible characters by name term and attribute filter.
    ///
    /// A missing filter behaves like an empty one.
    pub fn search(
        &self,
        search_term: Option<&str>,
        filter: Option<&FilterSpec>,
        request: &PageRequest,
    ) -> CatalogResult<Page<CharacterView>> {
        let empty = FilterSpec::default();
        let predicate = CharacterPredicate::build(filter.unwrap_or(&empty), search_term);
        debug!(
            "event=character_search module=catalog status=start clauses={} page={} size={}",
            predicate.clauses().len(),
            request.page(),
            request.size()
        );
        let page = self.repo.find_visible_page(&predicate, request)?;
        Ok(page.map(CharacterView::from))
    }

    pub fn get_by_id(&self, id: CharacterId) -> CatalogResult<CharacterView> {
        Ok(self.load_visible(id)?.into())
    }

    /// Applies every field present in `patch` to a visible character.
    ///
    /// `patch.id` and `patch.is_deleted` are ignored.
    pub fn update(&self, id: CharacterId, patch: &CharacterPatch) -> CatalogResult<CharacterView> {
        let mut character = self.load_visible(id)?;
        patch.apply_to(&mut character);
        let updated = self.repo.update(&character)?;
        info!("event=character_update module=catalog status=ok id={id}");
        Ok(updated.into())
    }

    /// Replaces the sprite of a visible character.
    ///
    /// # Errors
    /// - `NotFound` when the character is absent or tombstoned.
    /// - `InvalidInput` when `bytes` is empty or the store rejects
    ///   `original_name`; the current sprite is kept then.
    /// - `Asset` when the new sprite cannot be stored; nothing is written then.
    pub fn update_sprite(
        &self,
        id: CharacterId,
        bytes: &[u8],
        original_name: Option<&str>,
    ) -> CatalogResult<CharacterView> {
        let mut character = self.load_visible(id)?;

        if bytes.is_empty() {
            return Err(CatalogError::InvalidInput(
                "sprite file cannot be empty".to_string(),
            ));
        }
        if let Some(original_name) = original_name {
            self.assets.check_original_name(original_name)?;
        }

        if let Some(previous) = character.sprite_path.as_deref() {
            self.discard_sprite(id, previous);
        }

        let asset_name = self.assets.put(bytes, original_name)?;
        character.sprite_path = Some(format!("{SPRITE_URL_PREFIX}{asset_name}"));

        let updated = self.repo.update(&character)?;
        info!(
            "event=sprite_update module=catalog status=ok id={id} asset={asset_name} bytes={}",
            bytes.len()
        );
        Ok(updated.into())
    }

    /// Tombstones a visible character.
    ///
    /// A second call for the same id reports `NotFound`.
    pub fn soft_delete(&self, id: CharacterId) -> CatalogResult<()> {
        let mut character = self.load_visible(id)?;
        character.soft_delete();
        self.repo.update(&character)?;
        info!("event=character_soft_delete module=catalog status=ok id={id}");
        Ok(())
    }

    /// Physically removes a character whether or not it is tombstoned.
    pub fn hard_delete(&self, id: CharacterId) -> CatalogResult<()> {
        if !self.repo.exists_by_id(id)? {
            return Err(CatalogError::NotFound(id));
        }
        self.repo.delete_by_id(id)?;
        info!("event=character_hard_delete module=catalog status=ok id={id}");
        Ok(())
    }

    fn load_visible(&self, id: CharacterId) -> CatalogResult<Character> {
        self.repo
            .find_visible_by_id(id)?
            .ok_or(CatalogError::NotFound(id))
    }

    fn discard_sprite(&self, id: CharacterId, sprite_path: &str) {
        let asset_name = sprite_path.rsplit('/').next().unwrap_or(sprite_path);
        if asset_name.is_empty() {
            return;
        }

        match self.assets.delete(asset_name) {
            Ok(true) => debug!(
                "event=sprite_cleanup module=catalog status=ok id={id} asset={asset_name}"
            ),
            Ok(false) => debug!(
                "event=sprite_cleanup module=catalog status=missing id={id} asset={asset_name}"
            ),
            Err(err) => warn!(
                "event=sprite_cleanup module=catalog status=error id={id} asset={asset_name} error={err}"
            ),
        }
    }
}
