//! Write-side request models.
//!
//! # Responsibility
//! - Carry caller input for create and partial update use-cases.
//! - Resolve creation defaults in exactly one place.
//!
//! # Invariants
//! - Stat defaults are applied by [`NewCharacter::from_input`] only, never on
//!   update paths.
//! - [`CharacterPatch`] distinguishes "field omitted" from "field set to null"
//!   for nullable attributes.

use crate::model::character::{
    validate_fields, BaseStats, Character, CharacterId, CharacterType, CharacterValidationError,
    Classification, Stat,
};
use serde::{Deserialize, Deserializer};

/// Caller input for creating a character.
///
/// Every stat is optional; unset stats take [`BaseStats::CREATION_DEFAULTS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub character_type: Option<CharacterType>,
    pub classification: Option<Classification>,
    pub sprite_path: Option<String>,
    pub base_health: Option<i32>,
    pub base_attack: Option<i32>,
    pub base_magic: Option<i32>,
    pub base_physical_defense: Option<i32>,
    pub base_magical_defense: Option<i32>,
    pub base_speed: Option<i32>,
}

impl CharacterInput {
    /// Shorthand for an input carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn stat(&self, stat: Stat) -> Option<i32> {
        match stat {
            Stat::Health => self.base_health,
            Stat::Attack => self.base_attack,
            Stat::Magic => self.base_magic,
            Stat::PhysicalDefense => self.base_physical_defense,
            Stat::MagicalDefense => self.base_magical_defense,
            Stat::Speed => self.base_speed,
        }
    }
}

/// Fully resolved, not yet persisted character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: String,
    pub description: Option<String>,
    pub kind: CharacterType,
    pub classification: Option<Classification>,
    pub sprite_path: Option<String>,
    pub stats: BaseStats,
}

impl NewCharacter {
    /// Resolves creation defaults from caller input.
    ///
    /// # Contract
    /// - Unset `type` becomes [`CharacterType::Npc`].
    /// - Each unset stat takes its creation default.
    pub fn from_input(input: &CharacterInput) -> Self {
        let mut stats = BaseStats::CREATION_DEFAULTS;
        for stat in Stat::ALL {
            if let Some(value) = input.stat(stat) {
                stats.set(stat, value);
            }
        }

        Self {
            name: input.name.clone(),
            description: input.description.clone(),
            kind: input.character_type.unwrap_or(CharacterType::Npc),
            classification: input.classification,
            sprite_path: input.sprite_path.clone(),
            stats,
        }
    }

    pub fn validate(&self) -> Result<(), CharacterValidationError> {
        validate_fields(&self.name, self.sprite_path.as_deref())
    }
}

/// Partial update request with per-field presence.
///
/// `None` means "leave unchanged". For nullable attributes the inner option
/// carries the new value, so `Some(None)` clears the stored value. `id` and
/// `is_deleted` are accepted so payloads echoing a read model deserialize,
/// but they are never applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPatch {
    pub id: Option<CharacterId>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(rename = "type")]
    pub character_type: Option<CharacterType>,
    #[serde(default, deserialize_with = "present")]
    pub classification: Option<Option<Classification>>,
    #[serde(default, deserialize_with = "present")]
    pub sprite_path: Option<Option<String>>,
    pub base_health: Option<i32>,
    pub base_attack: Option<i32>,
    pub base_magic: Option<i32>,
    pub base_physical_defense: Option<i32>,
    pub base_magical_defense: Option<i32>,
    pub base_speed: Option<i32>,
    pub is_deleted: Option<bool>,
}

impl CharacterPatch {
    pub fn stat(&self, stat: Stat) -> Option<i32> {
        match stat {
            Stat::Health => self.base_health,
            Stat::Attack => self.base_attack,
            Stat::Magic => self.base_magic,
            Stat::PhysicalDefense => self.base_physical_defense,
            Stat::MagicalDefense => self.base_magical_defense,
            Stat::Speed => self.base_speed,
        }
    }

    /// Copies every present field onto `target`.
    ///
    /// `id`, `is_deleted` and `created_at` on `target` are left untouched.
    pub fn apply_to(&self, target: &mut Character) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(description) = &self.description {
            target.description = description.clone();
        }
        if let Some(kind) = self.character_type {
            target.kind = kind;
        }
        if let Some(classification) = self.classification {
            target.classification = classification;
        }
        if let Some(sprite_path) = &self.sprite_path {
            target.sprite_path = sprite_path.clone();
        }
        for stat in Stat::ALL {
            if let Some(value) = self.stat(stat) {
                target.stats.set(stat, value);
            }
        }
    }
}

// An explicit JSON `null` must deserialize to `Some(None)`, not `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
