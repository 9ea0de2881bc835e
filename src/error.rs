//! Error types for MentorCore

use thiserror::Error;
use crate::localization::Translations;

/// Main error type for tutor operations
#[derive(Error, Debug)]
pub enum TutorError {
    /// Bad user input; blocks the action
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Wrong password for an existing username
    #[error("Invalid credentials")]
    Auth,

    /// The AI gateway call failed
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Persisted JSON could not be parsed
    #[error("Corrupt state under '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    /// Structured AI output could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operation requires a logged-in identity
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Operation requires a completed profile
    #[error("Profile required")]
    ProfileRequired,

    /// Chat thread not found
    #[error("Chat not found: {0}")]
    ChatNotFound(i64),

    /// Key-value store operation failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Report export failed
    #[error("Export error: {0}")]
    ExportError(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Localization error
    #[error("Localization error: {0}")]
    LocalizationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Input validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Username must be at least {0} characters")]
    UsernameTooShort(usize),
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Username not found")]
    UsernameNotFound,
    #[error("Name is required")]
    NameRequired,
    #[error("Grade must be between {min} and {max}")]
    GradeOutOfRange { min: u8, max: u8 },
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Quiz has no questions")]
    EmptyQuiz,
    #[error("Question {0} does not exist")]
    QuestionOutOfRange(usize),
    #[error("Option {0} does not exist")]
    OptionOutOfRange(usize),
    #[error("Pick a specific subject")]
    SubjectRequired,
    #[error("No quiz history for this subject")]
    NoHistory,
}

/// AI gateway failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// HTTP 429 from the completion endpoint
    #[error("Rate limited")]
    RateLimited,
    /// Any other non-2xx status
    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },
    /// Network failure or unreadable body
    #[error("Transport error: {0}")]
    Transport(String),
    /// Success status but no candidate text
    #[error("Empty response")]
    EmptyResponse,
    /// No API key configured
    #[error("Gateway not configured")]
    NotConfigured,
}

impl From<rusqlite::Error> for TutorError {
    fn from(err: rusqlite::Error) -> Self {
        TutorError::StorageError(err.to_string())
    }
}

impl TutorError {
    /// Localization key of the user-facing message
    pub fn message_key(&self) -> &'static str {
        match self {
            TutorError::Validation(v) => v.message_key(),
            TutorError::Auth => "error_wrong_password",
            TutorError::Gateway(GatewayError::RateLimited) => "error_rate_limited",
            TutorError::Gateway(_) => "error_gateway",
            TutorError::CorruptState { .. } | TutorError::StorageError(_) => "error_storage",
            TutorError::Parse(_) => "error_parse",
            TutorError::NotAuthenticated => "error_not_authenticated",
            TutorError::ProfileRequired => "error_profile_required",
            TutorError::ChatNotFound(_) => "error_chat_not_found",
            TutorError::ExportError(_) => "error_export",
            TutorError::ConfigError(_) | TutorError::LocalizationError(_) | TutorError::IoError(_) => {
                "error_internal"
            }
        }
    }

    /// Render the error for display
    pub fn user_message(&self, tr: &Translations) -> String {
        let text = tr.get(self.message_key());
        match self {
            TutorError::Validation(ValidationError::UsernameTooShort(n))
            | TutorError::Validation(ValidationError::PasswordTooShort(n)) => {
                text.replace("{n}", &n.to_string())
            }
            TutorError::Validation(ValidationError::GradeOutOfRange { min, max }) => text
                .replace("{min}", &min.to_string())
                .replace("{max}", &max.to_string()),
            TutorError::Gateway(GatewayError::Status { code, .. }) => {
                text.replace("{code}", &code.to_string())
            }
            _ => text.to_string(),
        }
    }

    /// True for failures the caller must surface as a blocking message
    pub fn is_blocking(&self) -> bool {
        matches!(self, TutorError::Validation(_) | TutorError::Auth)
    }
}

impl ValidationError {
    fn message_key(&self) -> &'static str {
        match self {
            ValidationError::UsernameRequired => "error_username_required",
            ValidationError::PasswordRequired => "error_password_required",
            ValidationError::UsernameTooShort(_) => "error_username_short",
            ValidationError::PasswordTooShort(_) => "error_password_short",
            ValidationError::PasswordMismatch => "error_password_mismatch",
            ValidationError::UsernameTaken => "error_username_taken",
            ValidationError::UsernameNotFound => "error_username_not_found",
            ValidationError::NameRequired => "error_name_required",
            ValidationError::GradeOutOfRange { .. } => "error_grade_range",
            ValidationError::EmptyMessage => "error_empty_message",
            ValidationError::EmptyQuiz => "error_empty_quiz",
            ValidationError::QuestionOutOfRange(_) | ValidationError::OptionOutOfRange(_) => {
                "error_invalid_answer"
            }
            ValidationError::SubjectRequired => "error_subject_required",
            ValidationError::NoHistory => "error_no_history",
        }
    }
}

/// Result type alias for tutor operations
pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TutorError::ChatNotFound(42);
        assert!(err.to_string().contains("42"));

        let err = TutorError::Auth;
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = TutorError::CorruptState { key: "tutor_users".into(), reason: "eof".into() };
        assert!(err.to_string().contains("tutor_users"));

        let err: TutorError = ValidationError::UsernameTooShort(3).into();
        assert!(err.to_string().contains("3"));

        let err: TutorError = GatewayError::Status { code: 500, message: "boom".into() }.into();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_error_from_rusqlite() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let err: TutorError = sqlite_err.into();
        match err {
            TutorError::StorageError(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected StorageError"),
        }
    }

    #[test]
    fn test_rate_limit_message_differs_from_generic() {
        let tr = Translations::new().unwrap();
        let limited = TutorError::Gateway(GatewayError::RateLimited).user_message(&tr);
        let generic = TutorError::Gateway(GatewayError::Status { code: 503, message: String::new() })
            .user_message(&tr);
        assert_ne!(limited, generic);
        assert!(generic.contains("503"));
    }

    #[test]
    fn test_user_message_fills_placeholders() {
        let tr = Translations::new().unwrap();
        let msg = TutorError::from(ValidationError::PasswordTooShort(6)).user_message(&tr);
        assert!(msg.contains('6'));
        assert!(!msg.contains("{n}"));
    }

    #[test]
    fn test_is_blocking() {
        assert!(TutorError::Auth.is_blocking());
        assert!(TutorError::from(ValidationError::NameRequired).is_blocking());
        assert!(!TutorError::Gateway(GatewayError::RateLimited).is_blocking());
        assert!(!TutorError::Parse("x".into()).is_blocking());
    }
}
