//! Runtime configuration
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | GEMINI_API_KEY | none | Key for the generative-language API |
//! | MENTOR_MODEL | gemini-2.5-flash | Model name |
//! | MENTOR_API_BASE | https://generativelanguage.googleapis.com/v1beta | API base URL |
//! | MENTOR_TIMEOUT_SECS | 60 | Per-request timeout |
//! | MENTOR_HISTORY_WINDOW | 4 | Prior chat messages sent as context |
//! | MENTOR_LANGUAGE | en | Message catalog and AI reply language |
//! | MENTOR_STORAGE_PATH | none | SQLite file for app state |
//! | MENTOR_FONT_DIR | none | Directory with TTF fonts for PDF export |

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{TutorError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_FONT_FAMILY: &str = "LiberationSans";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_history_window() -> usize {
    crate::HISTORY_WINDOW
}

fn default_language() -> String {
    crate::localization::DEFAULT_LANGUAGE.to_string()
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

/// Tutor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            request_timeout_secs: default_timeout(),
            history_window: default_history_window(),
            language: default_language(),
            storage_path: None,
            font_dir: None,
            font_family: default_font_family(),
        }
    }
}

impl TutorConfig {
    /// Load from the process environment (after reading `.env` if present).
    /// Unset or invalid values fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            api_key: get("GEMINI_API_KEY"),
            model: get("MENTOR_MODEL").unwrap_or(defaults.model),
            api_base: get("MENTOR_API_BASE").unwrap_or(defaults.api_base),
            request_timeout_secs: get("MENTOR_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|&secs: &u64| secs > 0)
                .unwrap_or(defaults.request_timeout_secs),
            history_window: get("MENTOR_HISTORY_WINDOW")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.history_window),
            language: get("MENTOR_LANGUAGE")
                .filter(|lang| crate::localization::is_language_supported(lang))
                .unwrap_or(defaults.language),
            storage_path: get("MENTOR_STORAGE_PATH").map(PathBuf::from),
            font_dir: get("MENTOR_FONT_DIR").map(PathBuf::from),
            font_family: defaults.font_family,
        }
    }

    /// Parse a TOML document; every field is optional
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| TutorError::ConfigError(e.to_string()))
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// True if an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TutorConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.history_window, 4);
        assert_eq!(config.language, "en");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_from_lookup() {
        let config = TutorConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", " abc "),
            ("MENTOR_MODEL", "gemini-pro"),
            ("MENTOR_TIMEOUT_SECS", "15"),
            ("MENTOR_HISTORY_WINDOW", "6"),
            ("MENTOR_LANGUAGE", "id"),
            ("MENTOR_STORAGE_PATH", "/tmp/mentor.db"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.history_window, 6);
        assert_eq!(config.language, "id");
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/mentor.db")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = TutorConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "   "),
            ("MENTOR_TIMEOUT_SECS", "soon"),
            ("MENTOR_HISTORY_WINDOW", "-1"),
            ("MENTOR_LANGUAGE", "fr"),
        ]));
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.history_window, 4);
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_from_toml() {
        let config = TutorConfig::from_toml_str(
            r#"
            api_key = "k"
            history_window = 2
            font_dir = "/usr/share/fonts/liberation"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.history_window, 2);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.font_family, "LiberationSans");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TutorConfig::from_toml_str("history_window = \"many\"").unwrap_err();
        assert!(matches!(err, TutorError::ConfigError(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mentor.toml");
        std::fs::write(&path, "language = \"id\"\n").unwrap();
        let config = TutorConfig::load(&path).unwrap();
        assert_eq!(config.language, "id");
        assert!(TutorConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
