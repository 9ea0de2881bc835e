//! AI gateway
//!
//! The tutor talks to a generative-language backend through [`AiGateway`].
//! Every call returns the raw completion text; interpreting it is left to
//! [`crate::parser`] and the business layer.

mod gemini;
pub mod prompts;

pub use gemini::GeminiGateway;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use crate::database::{Level, Message, Sender};
use crate::error::Result;

/// File sent along with a chat message (image or PDF)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Standard base64 of the file bytes
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// Speaker of a history turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRole {
    User,
    Model,
}

impl HistoryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRole::User => "user",
            HistoryRole::Model => "model",
        }
    }
}

/// Prior message sent as conversation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: HistoryRole,
    pub text: String,
}

impl From<&Message> for HistoryTurn {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.sender {
                Sender::User => HistoryRole::User,
                Sender::Ai => HistoryRole::Model,
            },
            text: msg.history_text().to_string(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub text: String,
    pub level: Level,
    /// Audience label, e.g. `Kelas 8 (SMP)`
    pub level_label: String,
    pub attachment: Option<Attachment>,
    /// Guided questioning instead of direct answers
    pub socratic: bool,
    /// Oldest first
    pub history: Vec<HistoryTurn>,
}

/// Quiz generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub grade: i32,
    pub level: Level,
    pub subject: String,
    pub topic: String,
}

/// One quiz result summarised for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisEntry {
    pub topic: String,
    pub score: u8,
}

/// Report analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub student_name: String,
    pub grade: i32,
    pub subject: String,
    pub entries: Vec<AnalysisEntry>,
}

/// Generative-language backend
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Tutor reply to a chat message; may end with an inline quiz block
    async fn complete_chat(&self, request: &ChatRequest) -> Result<String>;

    /// JSON array of `{question, options, correctIndex, explanation}`
    async fn generate_quiz(&self, request: &QuizRequest) -> Result<String>;

    /// JSON object `{strength, weakness, advice, prediction, motivational_quote}`
    async fn analyze_report(&self, request: &AnalysisRequest) -> Result<String>;
}
