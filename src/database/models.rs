//! Data models persisted by MentorCore
//!
//! Field names serialize in camelCase to stay readable by previously saved data.

use std::collections::BTreeMap;
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::parser::QuizDirective;
use crate::utils::{format_report_date, parse_locale_date, parse_timestamp};

/// Authenticated account reference (the current-identity marker)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    /// Refreshed on every login
    pub login_time: DateTime<Utc>,
}

/// Entry of the credential table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub user_id: String,
    pub username: String,
    /// Argon2 PHC string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Plaintext password written by older versions; replaced by a hash on login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Credential table keyed by username
pub type CredentialTable = BTreeMap<String, CredentialRecord>;

/// Academic level derived from the current grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Grades 1-6
    Sd,
    /// Grades 7-9
    Smp,
    /// Grades 10-12
    Sma,
    /// Grade 13 and above, or anything out of band
    Mahasiswa,
}

impl Level {
    /// Band a current grade
    pub fn from_grade(current_grade: i32) -> Self {
        match current_grade {
            1..=6 => Level::Sd,
            7..=9 => Level::Smp,
            10..=12 => Level::Sma,
            _ => Level::Mahasiswa,
        }
    }

    /// Label used in prompts and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Sd => "SD",
            Level::Smp => "SMP",
            Level::Sma => "SMA",
            Level::Mahasiswa => "MAHASISWA",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile as persisted; derived fields are never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    pub name: String,
    /// Grade at `registered_at`
    pub grade: u8,
    pub registered_at: DateTime<Utc>,
    pub user_id: String,
    pub username: String,
}

/// Profile with grade progression applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub grade: u8,
    pub registered_at: DateTime<Utc>,
    pub user_id: String,
    pub username: String,
    /// `grade` plus the calendar years since `registered_at`
    pub current_grade: i32,
    pub level: Level,
}

impl Profile {
    /// Strip the derived fields
    pub fn to_stored(&self) -> StoredProfile {
        StoredProfile {
            name: self.name.clone(),
            grade: self.grade,
            registered_at: self.registered_at,
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }

    /// Audience label sent with chat requests, e.g. `Kelas 8 (SMP)`
    pub fn level_label(&self) -> String {
        format!("Kelas {} ({})", self.current_grade, self.level)
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// Chat message; immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender: Sender,
    /// Display text (quiz directive stripped)
    pub text: String,
    /// Raw AI completion, reused as conversation history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parser::deserialize_directive"
    )]
    pub quiz: Option<QuizDirective>,
}

impl Message {
    /// Text to send back to the AI as history
    pub fn history_text(&self) -> &str {
        self.original_text.as_deref().unwrap_or(&self.text)
    }
}

/// Chat thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThread {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ChatThread {
    /// Empty thread with the default title
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: crate::NEW_CHAT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }
}

/// When a quiz was taken
///
/// Older saves hold a locale date string such as `16/10/2026`. Those are
/// parsed when the form is recognised and kept verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QuizDate {
    At(DateTime<Utc>),
    Raw(String),
}

impl QuizDate {
    /// Parse an RFC 3339 timestamp or a locale date
    pub fn parse(s: &str) -> Self {
        parse_timestamp(s)
            .or_else(|| parse_locale_date(s))
            .map(QuizDate::At)
            .unwrap_or_else(|| QuizDate::Raw(s.to_string()))
    }

    pub fn timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            QuizDate::At(dt) => Some(dt),
            QuizDate::Raw(_) => None,
        }
    }

    /// Date as printed on reports
    pub fn report_label(&self) -> String {
        match self {
            QuizDate::At(dt) => format_report_date(dt),
            QuizDate::Raw(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for QuizDate {
    fn from(dt: DateTime<Utc>) -> Self {
        QuizDate::At(dt)
    }
}

impl<'de> Deserialize<'de> for QuizDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(QuizDate::parse(&raw))
    }
}

/// Completed quiz, stored newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,
    pub date: QuizDate,
    pub subject: String,
    pub topic: String,
    /// 0-100
    pub score: u8,
    /// Number of questions
    pub total: u32,
}

impl QuizResult {
    /// True if the score reaches the pass mark
    pub fn passed(&self) -> bool {
        self.score >= crate::QUIZ_PASS_SCORE
    }
}

/// Everything persisted per identity under one key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBundle {
    #[serde(default)]
    pub chats: Vec<ChatThread>,
    #[serde(default)]
    pub selected_chat_id: Option<i64>,
    #[serde(default)]
    pub quiz_history: Vec<QuizResult>,
}

impl SessionBundle {
    /// Largest id used by any thread, message or quiz result
    pub fn max_id(&self) -> i64 {
        let chat_ids = self.chats.iter().flat_map(|c| {
            std::iter::once(c.id).chain(c.messages.iter().map(|m| m.id))
        });
        let quiz_ids = self.quiz_history.iter().map(|q| q.id);
        chat_ids.chain(quiz_ids).max().unwrap_or(0)
    }
}
