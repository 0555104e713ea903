//! Application-defined SQL functions.
//!
//! # Invariants
//! - `unicode_lower(text)` lowercases with the same rules as Rust's
//!   `str::to_lowercase`, so SQL and in-memory name matching agree.
//! - `unicode_lower(NULL)` is `NULL`.
//! - Registration is idempotent; re-registering replaces the function.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub(crate) const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Registers catalog SQL functions on `conn`.
pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|value| value.to_lowercase()))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::register_functions;
    use rusqlite::Connection;

    #[test]
    fn unicode_lower_folds_non_ascii_letters_and_keeps_null() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        register_functions(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT unicode_lower('ÉLODIE Grün');", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "élodie grün");

        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL);", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
