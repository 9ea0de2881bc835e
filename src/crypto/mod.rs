//! Cryptographic operations for MentorCore
//!
//! Only credential hashing lives here; nothing else in the app state is
//! encrypted.

pub mod password;

pub use password::{hash_password, verify_password, verify_credential, Verification};
