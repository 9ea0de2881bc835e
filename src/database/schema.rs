//! Database schema definitions

/// SQL to create the key-value table
pub const CREATE_STORAGE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS mentor_storage (
    storage_key      TEXT NOT NULL PRIMARY KEY,
    value            TEXT NOT NULL,
    change_timestamp TEXT
)
"#;

/// All table creation statements in order
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_STORAGE_TABLE,
];
