//! SQL query operations for the key-value table
//!
//! Low-level functions; use `PersistenceGateway` for typed access.

use rusqlite::{Connection, OptionalExtension, params};
use crate::error::Result;
use crate::utils::{format_timestamp, now};

/// Get the value stored under a key
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM mentor_storage WHERE storage_key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Insert or replace the value under a key
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO mentor_storage (storage_key, value, change_timestamp) VALUES (?, ?, ?)
         ON CONFLICT(storage_key) DO UPDATE SET
             value = excluded.value,
             change_timestamp = excluded.change_timestamp",
        params![key, value, format_timestamp(&now())],
    )?;
    Ok(())
}

/// Delete a key (no-op if absent)
pub fn remove_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM mentor_storage WHERE storage_key = ?",
        params![key],
    )?;
    Ok(())
}

/// All stored keys, sorted
pub fn list_keys(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT storage_key FROM mentor_storage ORDER BY storage_key")?;
    let keys = stmt.query_map([], |row| row.get(0))?;
    keys.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}
