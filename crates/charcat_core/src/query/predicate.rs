//! Composable character predicates.
//!
//! # Responsibility
//! - Build one conjunctive predicate from a [`FilterSpec`] and a search term.
//! - Evaluate predicates in memory and compile them to parameterised SQL.
//!
//! # Invariants
//! - The first clause is always [`Clause::NotDeleted`]; callers cannot remove it.
//! - Absent filter fields contribute no clause.
//! - Building is pure: equal inputs give equal predicates.
//! - Name matching folds case with Unicode lowercase rules, in memory and in
//!   SQL through the `unicode_lower` connection function.

use crate::model::character::{Character, CharacterType, Classification, Stat};
use crate::query::filter::FilterSpec;
use rusqlite::types::Value;

/// One atomic condition over a character row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    NotDeleted,
    /// Needle is stored lowercased.
    NameContains(String),
    TypeIs(CharacterType),
    ClassificationIs(Classification),
    StatAtLeast(Stat, i32),
    StatAtMost(Stat, i32),
}

impl Clause {
    pub fn matches(&self, character: &Character) -> bool {
        match self {
            Self::NotDeleted => !character.is_deleted,
            Self::NameContains(needle) => character
                .name
                .to_lowercase()
                .contains(needle.as_str()),
            Self::TypeIs(kind) => character.kind == *kind,
            Self::ClassificationIs(classification) => {
                character.classification == Some(*classification)
            }
            Self::StatAtLeast(stat, min) => character.stats.get(*stat) >= *min,
            Self::StatAtMost(stat, max) => character.stats.get(*stat) <= *max,
        }
    }

    fn push_sql(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            Self::NotDeleted => sql.push_str("is_deleted = 0"),
            Self::NameContains(needle) => {
                sql.push_str("instr(unicode_lower(name), ?) > 0");
                params.push(Value::Text(needle.clone()));
            }
            Self::TypeIs(kind) => {
                sql.push_str("type = ?");
                params.push(Value::Text(kind.as_str().to_string()));
            }
            Self::ClassificationIs(classification) => {
                sql.push_str("classification = ?");
                params.push(Value::Text(classification.as_str().to_string()));
            }
            Self::StatAtLeast(stat, min) => {
                sql.push_str(stat.column());
                sql.push_str(" >= ?");
                params.push(Value::Integer(i64::from(*min)));
            }
            Self::StatAtMost(stat, max) => {
                sql.push_str(stat.column());
                sql.push_str(" <= ?");
                params.push(Value::Integer(i64::from(*max)));
            }
        }
    }
}

/// Compiled `WHERE` body plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlWhere {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Logical AND of clauses, always including visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPredicate {
    clauses: Vec<Clause>,
}

impl Default for CharacterPredicate {
    fn default() -> Self {
        Self::visible()
    }
}

impl CharacterPredicate {
    /// Predicate matching every non-deleted character.
    pub fn visible() -> Self {
        Self {
            clauses: vec![Clause::NotDeleted],
        }
    }

    /// Composes filter fields and search term into one predicate.
    ///
    /// A blank (after trimming) term adds nothing. Filters whose minimum
    /// exceeds their maximum are kept as-is and simply match nothing.
    pub fn build(filter: &FilterSpec, search_term: Option<&str>) -> Self {
        let mut predicate = Self::visible();

        if let Some(needle) = name_needle(search_term) {
            predicate.push(Clause::NameContains(needle));
        }
        if let Some(needle) = name_needle(filter.name.as_deref()) {
            predicate.push(Clause::NameContains(needle));
        }
        if let Some(kind) = filter.character_type {
            predicate.push(Clause::TypeIs(kind));
        }
        if let Some(classification) = filter.classification {
            predicate.push(Clause::ClassificationIs(classification));
        }
        for stat in Stat::ALL {
            let (min, max) = filter.bounds(stat);
            if let Some(min) = min {
                predicate.push(Clause::StatAtLeast(stat, min));
            }
            if let Some(max) = max {
                predicate.push(Clause::StatAtMost(stat, max));
            }
        }

        predicate
    }

    fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, character: &Character) -> bool {
        self.clauses.iter().all(|clause| clause.matches(character))
    }

    pub fn to_sql(&self) -> SqlWhere {
        let mut sql = String::new();
        let mut params = Vec::new();

        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                sql.push_str(" AND ");
            }
            clause.push_sql(&mut sql, &mut params);
        }

        SqlWhere { sql, params }
    }
}

fn name_needle(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}
