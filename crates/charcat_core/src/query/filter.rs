//! Filter specification for character search.

use crate::model::character::{CharacterType, Classification, Stat};
use crate::query::QueryError;

/// Transient query-time filter.
///
/// Every field is optional; an all-`None` filter constrains nothing beyond
/// visibility. Stat bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Extra case-insensitive substring match on `name`.
    pub name: Option<String>,
    pub character_type: Option<CharacterType>,
    pub classification: Option<Classification>,
    pub min_base_health: Option<i32>,
    pub max_base_health: Option<i32>,
    pub min_base_attack: Option<i32>,
    pub max_base_attack: Option<i32>,
    pub min_base_magic: Option<i32>,
    pub max_base_magic: Option<i32>,
    pub min_base_physical_defense: Option<i32>,
    pub max_base_physical_defense: Option<i32>,
    pub min_base_magical_defense: Option<i32>,
    pub max_base_magical_defense: Option<i32>,
    pub min_base_speed: Option<i32>,
    pub max_base_speed: Option<i32>,
}

impl FilterSpec {
    /// Returns the inclusive `(min, max)` bounds configured for `stat`.
    pub fn bounds(&self, stat: Stat) -> (Option<i32>, Option<i32>) {
        match stat {
            Stat::Health => (self.min_base_health, self.max_base_health),
            Stat::Attack => (self.min_base_attack, self.max_base_attack),
            Stat::Magic => (self.min_base_magic, self.max_base_magic),
            Stat::PhysicalDefense => (
                self.min_base_physical_defense,
                self.max_base_physical_defense,
            ),
            Stat::MagicalDefense => (self.min_base_magical_defense, self.max_base_magical_defense),
            Stat::Speed => (self.min_base_speed, self.max_base_speed),
        }
    }

    fn bound_slot(&mut self, stat: Stat, upper: bool) -> &mut Option<i32> {
        match (stat, upper) {
            (Stat::Health, false) => &mut self.min_base_health,
            (Stat::Health, true) => &mut self.max_base_health,
            (Stat::Attack, false) => &mut self.min_base_attack,
            (Stat::Attack, true) => &mut self.max_base_attack,
            (Stat::Magic, false) => &mut self.min_base_magic,
            (Stat::Magic, true) => &mut self.max_base_magic,
            (Stat::PhysicalDefense, false) => &mut self.min_base_physical_defense,
            (Stat::PhysicalDefense, true) => &mut self.max_base_physical_defense,
            (Stat::MagicalDefense, false) => &mut self.min_base_magical_defense,
            (Stat::MagicalDefense, true) => &mut self.max_base_magical_defense,
            (Stat::Speed, false) => &mut self.min_base_speed,
            (Stat::Speed, true) => &mut self.max_base_speed,
        }
    }

    /// Builds a filter from query-parameter style key/value pairs.
    ///
    /// Keys follow the external camelCase names (`type`, `minBaseAttack`, ...)
    /// or their snake_case spelling.
    ///
    /// # Contract
    /// - Unknown keys are ignored.
    /// - Blank values leave the field unset.
    /// - Unknown enum text leaves the field unset (no filter, no error).
    ///
    /// # Errors
    /// - [`QueryError::InvalidBound`] when a stat bound is not an integer.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();

        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let normalized = normalize_key(key);
            match normalized.as_str() {
                "name" => filter.name = Some(value.to_string()),
                "type" | "charactertype" => filter.character_type = CharacterType::parse(value),
                "classification" => filter.classification = Classification::parse(value),
                other => {
                    let Some((stat, upper)) = parse_bound_key(other) else {
                        continue;
                    };
                    let parsed = value.parse::<i32>().map_err(|_| QueryError::InvalidBound {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
                    *filter.bound_slot(stat, upper) = Some(parsed);
                }
            }
        }

        Ok(filter)
    }

    /// Returns whether no field constrains the result.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|ch| *ch != '_')
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn parse_bound_key(key: &str) -> Option<(Stat, bool)> {
    let (upper, rest) = if let Some(rest) = key.strip_prefix("min") {
        (false, rest)
    } else if let Some(rest) = key.strip_prefix("max") {
        (true, rest)
    } else {
        return None;
    };

    Stat::ALL
        .into_iter()
        .find(|stat| stat.field_name().eq_ignore_ascii_case(rest))
        .map(|stat| (stat, upper))
}
