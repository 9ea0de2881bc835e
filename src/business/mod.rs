//! Business logic layer for MentorCore
//!
//! This module provides the high-level Tutor API for accounts, profiles,
//! chat threads, quizzes and progress reports.

pub mod tutor;
pub mod account;
pub mod profile;
pub mod session;
pub mod chats;
pub mod subjects;
pub mod quiz;
pub mod report;
pub mod export;

pub use tutor::{AuthState, Tutor};
pub use profile::ProfilePatch;
pub use session::SessionStore;
