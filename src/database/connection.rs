//! SQLite-backed key-value store

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::config::TutorConfig;
use crate::error::{TutorError, Result};
use super::{queries, schema};
use super::store::KeyValueStore;

/// Database connection wrapper
pub struct Database {
    /// Path to the database file (None for in-memory)
    path: Option<PathBuf>,
    conn: Option<Connection>,
}

impl Database {
    /// Open (or create) a database at the specified path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(Some(path.to_path_buf()), conn)
    }

    /// Open the configured storage file, or an in-memory database when none is set
    pub fn from_config(config: &TutorConfig) -> Result<Self> {
        match &config.storage_path {
            Some(path) => Self::open(path),
            None => Self::open_in_memory(),
        }
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(None, conn)
    }

    fn init(path: Option<PathBuf>, conn: Connection) -> Result<Self> {
        for sql in schema::CREATE_ALL_TABLES {
            conn.execute(sql, [])?;
        }
        tracing::debug!(path = ?path, "storage opened");
        Ok(Self { path, conn: Some(conn) })
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| {
            TutorError::StorageError("Database not open".to_string())
        })
    }

    /// Get the database path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the database connection
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Check if database is open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// All stored keys
    pub fn keys(&self) -> Result<Vec<String>> {
        queries::list_keys(self.connection()?)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        queries::get_value(self.connection()?, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        queries::set_value(self.connection()?, key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        queries::remove_value(self.connection()?, key)
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}
