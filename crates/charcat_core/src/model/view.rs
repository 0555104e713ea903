//! Read-side projections returned to catalog callers.

use crate::model::character::{BaseStats, Character, CharacterId, CharacterType, Classification};
use serde::Serialize;

/// Externally visible shape of a character.
///
/// Mirrors [`Character`] minus the tombstone flag, which is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterView {
    pub id: CharacterId,
    #[serde(rename = "type")]
    pub kind: CharacterType,
    pub classification: Option<Classification>,
    pub name: String,
    pub description: Option<String>,
    pub sprite_path: Option<String>,
    #[serde(flatten)]
    pub stats: BaseStats,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Character> for CharacterView {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id,
            kind: character.kind,
            classification: character.classification,
            name: character.name.clone(),
            description: character.description.clone(),
            sprite_path: character.sprite_path.clone(),
            stats: character.stats,
            created_at: character.created_at,
            updated_at: character.updated_at,
        }
    }
}

impl From<Character> for CharacterView {
    fn from(character: Character) -> Self {
        Self {
            id: character.id,
            kind: character.kind,
            classification: character.classification,
            name: character.name,
            description: character.description,
            sprite_path: character.sprite_path,
            stats: character.stats,
            created_at: character.created_at,
            updated_at: character.updated_at,
        }
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index that was requested.
    pub page: u32,
    /// Effective page size used by the query.
    pub size: u32,
    /// Matching rows across all pages.
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, size: u32, total_items: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_items.div_ceil(u64::from(size))
        };
        Self {
            items,
            page,
            size,
            total_items,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages
    }
}
