//! Character domain model.
//!
//! # Responsibility
//! - Define the canonical persisted character record and its enumerations.
//! - Provide lifecycle helpers for soft-delete semantics.
//! - Validate records before they reach persistence.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - `is_deleted` is the source of truth for tombstone state.
//! - `created_at` is written once; `updated_at` moves on every write.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage-assigned character identifier.
pub type CharacterId = i64;

/// Maximum accepted `name` length, in characters.
pub const NAME_MAX_CHARS: usize = 50;
/// Maximum accepted `sprite_path` length, in characters.
pub const SPRITE_PATH_MAX_CHARS: usize = 255;

/// Narrative role of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CharacterType {
    Hero,
    Villain,
    /// Default role when the caller does not pick one.
    Npc,
}

impl CharacterType {
    pub const ALL: [CharacterType; 3] = [Self::Hero, Self::Villain, Self::Npc];

    /// Stable text form used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "HERO",
            Self::Villain => "VILLAIN",
            Self::Npc => "NPC",
        }
    }

    /// Case-insensitive parse. Unknown text yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

/// Species or category of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Human,
    Elf,
    Dwarf,
    Orc,
    Goblin,
    Undead,
    Dragon,
    Beast,
    Demon,
    Angel,
}

impl Classification {
    pub const ALL: [Classification; 10] = [
        Self::Human,
        Self::Elf,
        Self::Dwarf,
        Self::Orc,
        Self::Goblin,
        Self::Undead,
        Self::Dragon,
        Self::Beast,
        Self::Demon,
        Self::Angel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Elf => "Elf",
            Self::Dwarf => "Dwarf",
            Self::Orc => "Orc",
            Self::Goblin => "Goblin",
            Self::Undead => "Undead",
            Self::Dragon => "Dragon",
            Self::Beast => "Beast",
            Self::Demon => "Demon",
            Self::Angel => "Angel",
        }
    }

    /// Case-insensitive parse. Unknown text yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|classification| classification.as_str().eq_ignore_ascii_case(value))
    }
}

/// The six combat attributes carried by every character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(rename = "baseHealth")]
    pub health: i32,
    #[serde(rename = "baseAttack")]
    pub attack: i32,
    #[serde(rename = "baseMagic")]
    pub magic: i32,
    #[serde(rename = "basePhysicalDefense")]
    pub physical_defense: i32,
    #[serde(rename = "baseMagicalDefense")]
    pub magical_defense: i32,
    #[serde(rename = "baseSpeed")]
    pub speed: i32,
}

impl BaseStats {
    /// Values applied at creation for every stat the caller leaves unset.
    pub const CREATION_DEFAULTS: BaseStats = BaseStats {
        health: 100,
        attack: 10,
        magic: 10,
        physical_defense: 5,
        magical_defense: 5,
        speed: 10,
    };

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Health => self.health,
            Stat::Attack => self.attack,
            Stat::Magic => self.magic,
            Stat::PhysicalDefense => self.physical_defense,
            Stat::MagicalDefense => self.magical_defense,
            Stat::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::Health => self.health = value,
            Stat::Attack => self.attack = value,
            Stat::Magic => self.magic = value,
            Stat::PhysicalDefense => self.physical_defense = value,
            Stat::MagicalDefense => self.magical_defense = value,
            Stat::Speed => self.speed = value,
        }
    }
}

/// Names one of the six base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    Attack,
    Magic,
    PhysicalDefense,
    MagicalDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Self::Health,
        Self::Attack,
        Self::Magic,
        Self::PhysicalDefense,
        Self::MagicalDefense,
        Self::Speed,
    ];

    /// Column name in the `characters` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Health => "base_health",
            Self::Attack => "base_attack",
            Self::Magic => "base_magic",
            Self::PhysicalDefense => "base_physical_defense",
            Self::MagicalDefense => "base_magical_defense",
            Self::Speed => "base_speed",
        }
    }

    /// External (camelCase) attribute name.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Health => "baseHealth",
            Self::Attack => "baseAttack",
            Self::Magic => "baseMagic",
            Self::PhysicalDefense => "basePhysicalDefense",
            Self::MagicalDefense => "baseMagicalDefense",
            Self::Speed => "baseSpeed",
        }
    }
}

/// Validation failures for character records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterValidationError {
    #[error("character name cannot be blank")]
    EmptyName,
    #[error("character name has {actual} characters; at most {max} allowed")]
    NameTooLong { actual: usize, max: usize },
    #[error("sprite path has {actual} characters; at most {max} allowed")]
    SpritePathTooLong { actual: usize, max: usize },
}

/// Persisted character record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub description: Option<String>,
    pub kind: CharacterType,
    pub classification: Option<Classification>,
    pub sprite_path: Option<String>,
    pub stats: BaseStats,
    /// Soft delete tombstone. Tombstoned rows are only reachable by hard delete.
    pub is_deleted: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Character {
    pub fn validate(&self) -> Result<(), CharacterValidationError> {
        validate_fields(&self.name, self.sprite_path.as_deref())
    }

    /// Marks this character as softly deleted.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Returns whether this character is visible to normal reads.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

pub(crate) fn validate_fields(
    name: &str,
    sprite_path: Option<&str>,
) -> Result<(), CharacterValidationError> {
    if name.trim().is_empty() {
        return Err(CharacterValidationError::EmptyName);
    }

    let name_chars = name.chars().count();
    if name_chars > NAME_MAX_CHARS {
        return Err(CharacterValidationError::NameTooLong {
            actual: name_chars,
            max: NAME_MAX_CHARS,
        });
    }

    if let Some(path) = sprite_path {
        let path_chars = path.chars().count();
        if path_chars > SPRITE_PATH_MAX_CHARS {
            return Err(CharacterValidationError::SpritePathTooLong {
                actual: path_chars,
                max: SPRITE_PATH_MAX_CHARS,
            });
        }
    }

    Ok(())
}
