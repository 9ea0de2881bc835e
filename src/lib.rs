//! # MentorCore
//!
//! Session and data-model core for an AI tutoring application.
//!
//! ## Features
//!
//! - Local accounts with Argon2 credential hashing
//! - Learner profiles with grade progression across school years
//! - Multiple persisted chat threads per learner
//! - Inline quiz directives parsed out of AI replies
//! - AI-generated quizzes with scoring and history
//! - Progress reports with AI narrative analysis and PDF export
//!
//! ## Example
//!
//! ```no_run
//! use mentorcore::{Database, GeminiGateway, Tutor, TutorConfig};
//!
//! # async fn run() -> mentorcore::Result<()> {
//! let config = TutorConfig::from_env();
//! let db = Database::from_config(&config)?;
//! let mut tutor = Tutor::with_config(db, GeminiGateway::new(&config)?, &config)?;
//!
//! tutor.register("budi", "secret123", "secret123")?;
//! tutor.complete_onboarding("Budi", 7)?;
//!
//! let chat_id = tutor.selected_chat_id()?;
//! let reply = tutor.send_message(chat_id, "Apa itu fotosintesis?", None).await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod business;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod export;
pub mod gateway;
pub mod localization;
pub mod parser;
pub mod telemetry;
pub mod utils;

// Re-export main types
pub use business::{AuthState, Tutor};
pub use business::profile::{ProfilePatch, compute_status};
pub use business::quiz::{QuizQuestion, QuizSession};
pub use business::report::{Analysis, ReportStats, SubjectFilter};
pub use business::subjects::{SmaTrack, Subject};
pub use config::TutorConfig;
pub use database::{Database, KeyValueStore, MemoryStore, PersistenceGateway};
pub use database::models::{
    ChatThread, CredentialRecord, Identity, Level, Message, Profile, QuizDate, QuizResult, Sender,
    SessionBundle, StoredProfile,
};
pub use error::{GatewayError, Result, TutorError, ValidationError};
pub use export::{FontSource, ReportDocument, render_pdf, report_file_name};
pub use gateway::{AiGateway, Attachment, GeminiGateway};
pub use localization::Translations;
pub use parser::{ParsedResponse, QuizDirective, QuizOption, parse_response};

/// Default chat thread title
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Number of characters of the first user message used as thread title
pub const CHAT_TITLE_LENGTH: usize = 20;

/// Number of prior messages sent to the AI as conversation context
pub const HISTORY_WINDOW: usize = 4;

/// Minimum username length
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Lowest selectable grade
pub const GRADE_MIN: u8 = 1;

/// Highest selectable grade
pub const GRADE_MAX: u8 = 13;

/// Quiz score needed to count as passed
pub const QUIZ_PASS_SCORE: u8 = 75;

/// Prefix of generated user ids
pub const USER_ID_PREFIX: &str = "user_";
