//! Character repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide point lookup, full scan and predicate-filtered paginated scan
//!   over the `characters` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `created_at` is written by inserts only; every write refreshes `updated_at`.
//! - Concurrent updates of one row are last-writer-wins; there is no version
//!   column.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{register_functions, DbError, NOW_EPOCH_MS_SQL};
use crate::model::character::{
    BaseStats, Character, CharacterId, CharacterType, CharacterValidationError, Classification,
};
use crate::model::request::NewCharacter;
use crate::model::view::Page;
use crate::query::page::PageRequest;
use crate::query::predicate::CharacterPredicate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use thiserror::Error;

const CHARACTER_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    type,
    classification,
    sprite_path,
    base_health,
    base_attack,
    base_magic,
    base_physical_defense,
    base_magical_defense,
    base_speed,
    is_deleted,
    created_at,
    updated_at
FROM characters";

const REQUIRED_COLUMNS: [&str; 15] = [
    "id",
    "name",
    "description",
    "type",
    "classification",
    "sprite_path",
    "base_health",
    "base_attack",
    "base_magic",
    "base_physical_defense",
    "base_magical_defense",
    "base_speed",
    "is_deleted",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for character persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(#[from] CharacterValidationError),
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("character not found: {0}")]
    NotFound(CharacterId),
    #[error("invalid persisted character data: {0}")]
    InvalidData(String),
    #[error(
        "connection schema version {actual_version} does not match expected {expected_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("missing required table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("missing required column `{table}.{column}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for character storage.
pub trait CharacterRepository {
    /// Persists a new character; storage assigns `id` and both timestamps.
    fn insert(&self, draft: &NewCharacter) -> RepoResult<Character>;
    /// Overwrites every mutable column of an existing row, tombstoned or not.
    ///
    /// Returns [`RepoError::NotFound`] when no row has `character.id`.
    fn update(&self, character: &Character) -> RepoResult<Character>;
    fn find_visible_by_id(&self, id: CharacterId) -> RepoResult<Option<Character>>;
    /// Looks a row up regardless of its tombstone.
    fn find_by_id_including_deleted(&self, id: CharacterId) -> RepoResult<Option<Character>>;
    /// All non-deleted characters ordered by id.
    fn find_all_visible(&self) -> RepoResult<Vec<Character>>;
    /// Applies `predicate`, orders by `request` and returns one page plus the
    /// total match count across all pages.
    fn find_visible_page(
        &self,
        predicate: &CharacterPredicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Character>>;
    /// Ignores the tombstone.
    fn exists_by_id(&self, id: CharacterId) -> RepoResult<bool>;
    /// Physically removes a row, tombstoned or not.
    fn delete_by_id(&self, id: CharacterId) -> RepoResult<()>;
}

/// SQLite-backed character repository.
pub struct SqliteCharacterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCharacterRepository<'conn> {
    /// Creates a repository from a migrated connection.
    ///
    /// # Errors
    /// - [`RepoError::UninitializedConnection`] when the schema version differs.
    /// - [`RepoError::MissingRequiredTable`] / [`RepoError::MissingRequiredColumn`]
    ///   when the schema was tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        register_functions(conn)?;
        Ok(Self { conn })
    }

    fn load(&self, id: CharacterId, include_deleted: bool) -> RepoResult<Option<Character>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{CHARACTER_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_character_row(row)?));
        }

        Ok(None)
    }

    fn read_back(&self, id: CharacterId) -> RepoResult<Character> {
        self.load(id, true)?.ok_or(RepoError::NotFound(id))
    }
}

impl CharacterRepository for SqliteCharacterRepository<'_> {
    fn insert(&self, draft: &NewCharacter) -> RepoResult<Character> {
        draft.validate()?;

        self.conn.execute(
            &format!(
                "INSERT INTO characters (
                    name,
                    description,
                    type,
                    classification,
                    sprite_path,
                    base_health,
                    base_attack,
                    base_magic,
                    base_physical_defense,
                    base_magical_defense,
                    base_speed,
                    is_deleted,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
            ),
            params![
                draft.name.as_str(),
                draft.description.as_deref(),
                draft.kind.as_str(),
                draft.classification.map(Classification::as_str),
                draft.sprite_path.as_deref(),
                draft.stats.health,
                draft.stats.attack,
                draft.stats.magic,
                draft.stats.physical_defense,
                draft.stats.magical_defense,
                draft.stats.speed,
            ],
        )?;

        self.read_back(self.conn.last_insert_rowid())
    }

    fn update(&self, character: &Character) -> RepoResult<Character> {
        character.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE characters
                 SET
                    name = ?1,
                    description = ?2,
                    type = ?3,
                    classification = ?4,
                    sprite_path = ?5,
                    base_health = ?6,
                    base_attack = ?7,
                    base_magic = ?8,
                    base_physical_defense = ?9,
                    base_magical_defense = ?10,
                    base_speed = ?11,
                    is_deleted = ?12,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?13;"
            ),
            params![
                character.name.as_str(),
                character.description.as_deref(),
                character.kind.as_str(),
                character.classification.map(Classification::as_str),
                character.sprite_path.as_deref(),
                character.stats.health,
                character.stats.attack,
                character.stats.magic,
                character.stats.physical_defense,
                character.stats.magical_defense,
                character.stats.speed,
                bool_to_int(character.is_deleted),
                character.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(character.id));
        }

        self.read_back(character.id)
    }

    fn find_visible_by_id(&self, id: CharacterId) -> RepoResult<Option<Character>> {
        self.load(id, false)
    }

    fn find_by_id_including_deleted(&self, id: CharacterId) -> RepoResult<Option<Character>> {
        self.load(id, true)
    }

    fn find_all_visible(&self) -> RepoResult<Vec<Character>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CHARACTER_SELECT_SQL} WHERE is_deleted = 0 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut characters = Vec::new();

        while let Some(row) = rows.next()? {
            characters.push(parse_character_row(row)?);
        }

        Ok(characters)
    }

    fn find_visible_page(
        &self,
        predicate: &CharacterPredicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Character>> {
        let clause = predicate.to_sql();

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM characters WHERE {};", clause.sql),
            params_from_iter(clause.params.iter()),
            |row| row.get(0),
        )?;
        let total = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{total}`")))?;

        if request.offset() >= total {
            return Ok(Page::new(Vec::new(), request.page(), request.size(), total));
        }

        let sql = format!(
            "{CHARACTER_SELECT_SQL} WHERE {} ORDER BY {} LIMIT ? OFFSET ?;",
            clause.sql,
            request.order_by_sql()
        );
        let mut bind_values = clause.params;
        bind_values.push(Value::Integer(i64::from(request.size())));
        bind_values.push(Value::Integer(
            i64::try_from(request.offset()).unwrap_or(i64::MAX),
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_character_row(row)?);
        }

        Ok(Page::new(items, request.page(), request.size(), total))
    }

    fn exists_by_id(&self, id: CharacterId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM characters WHERE id = ?1;", [id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn delete_by_id(&self, id: CharacterId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM characters WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_character_row(row: &Row<'_>) -> RepoResult<Character> {
    let id: CharacterId = row.get("id")?;

    let type_text: String = row.get("type")?;
    let kind = CharacterType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid type `{type_text}` in characters.type"))
    })?;

    let classification = match row.get::<_, Option<String>>("classification")? {
        Some(value) => Some(Classification::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid classification `{value}` in characters.classification"
            ))
        })?),
        None => None,
    };

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in characters.is_deleted"
            )));
        }
    };

    let character = Character {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        kind,
        classification,
        sprite_path: row.get("sprite_path")?,
        stats: BaseStats {
            health: row.get("base_health")?,
            attack: row.get("base_attack")?,
            magic: row.get("base_magic")?,
            physical_defense: row.get("base_physical_defense")?,
            magical_defense: row.get("base_magical_defense")?,
            speed: row.get("base_speed")?,
        },
        is_deleted,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    character
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("character {id}: {err}")))?;
    Ok(character)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "characters")? {
        return Err(RepoError::MissingRequiredTable("characters"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "characters", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "characters",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
