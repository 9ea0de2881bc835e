//! Localization of user-facing messages
//!
//! English and Indonesian catalogs are embedded at compile time.

use std::collections::HashMap;
use crate::error::{Result, TutorError};

/// Supported languages with their codes and names
pub const SUPPORTED_LANGUAGES: &[(&str, &str, &str)] = &[
    ("en", "English", "English"),
    ("id", "Bahasa Indonesia", "Indonesian"),
];

/// Language used when none is configured
pub const DEFAULT_LANGUAGE: &str = "en";

const LANG_EN: &str = include_str!("languages/en.json");
const LANG_ID: &str = include_str!("languages/id.json");

/// Get the embedded JSON for a language code
fn get_language_json(lang: &str) -> Option<&'static str> {
    match lang {
        "en" => Some(LANG_EN),
        "id" => Some(LANG_ID),
        _ => None,
    }
}

/// Check if a language code is supported
pub fn is_language_supported(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(code, _, _)| *code == lang)
}

/// Translation catalog
pub struct Translations {
    current_lang: String,
    strings: HashMap<String, String>,
    /// Fallback catalog
    english: HashMap<String, String>,
}

impl Translations {
    /// Create a catalog with English selected
    pub fn new() -> Result<Self> {
        let english = Self::load_language(DEFAULT_LANGUAGE)?;
        Ok(Self {
            current_lang: DEFAULT_LANGUAGE.to_string(),
            strings: english.clone(),
            english,
        })
    }

    /// Create a catalog with the given language selected
    pub fn for_language(lang: &str) -> Result<Self> {
        let mut tr = Self::new()?;
        tr.set_language(lang)?;
        Ok(tr)
    }

    fn load_language(lang: &str) -> Result<HashMap<String, String>> {
        let json = get_language_json(lang)
            .ok_or_else(|| TutorError::LocalizationError(
                format!("Language '{}' not found", lang)
            ))?;

        let json = json.strip_prefix('\u{feff}').unwrap_or(json);

        serde_json::from_str(json)
            .map_err(|e| TutorError::LocalizationError(
                format!("Failed to parse language '{}': {}", lang, e)
            ))
    }

    /// Set the current language
    pub fn set_language(&mut self, lang: &str) -> Result<()> {
        if !is_language_supported(lang) {
            return Err(TutorError::LocalizationError(
                format!("Language '{}' is not supported", lang)
            ));
        }

        self.strings = Self::load_language(lang)?;
        self.current_lang = lang.to_string();
        Ok(())
    }

    /// Get a translated string by key, or the key itself if unknown
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.get_opt(key).unwrap_or(key)
    }

    /// Get a translated string, returning None if not found
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.strings.get(key)
            .or_else(|| self.english.get(key))
            .map(|s| s.as_str())
    }

    /// Get the current language code
    pub fn get_language(&self) -> &str {
        &self.current_lang
    }

    /// Get available languages as (code, local_name, english_name) tuples
    pub fn available_languages() -> &'static [(&'static str, &'static str, &'static str)] {
        SUPPORTED_LANGUAGES
    }
}
