//! Account operations
//!
//! Registration, login, logout and account deletion for the local
//! credential table.

use crate::crypto::{hash_password, verify_credential, Verification};
use crate::database::{CredentialRecord, Identity, KeyValueStore};
use crate::error::{TutorError, Result, ValidationError};
use crate::utils::{generate_user_id, now};
use crate::{PASSWORD_MIN_LENGTH, USERNAME_MIN_LENGTH};
use super::tutor::Tutor;

/// Shared checks for register and login; returns the trimmed username
fn validate_credentials(username: &str, password: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired.into());
    }
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired.into());
    }
    if username.chars().count() < USERNAME_MIN_LENGTH {
        return Err(ValidationError::UsernameTooShort(USERNAME_MIN_LENGTH).into());
    }
    Ok(username.to_string())
}

impl<S: KeyValueStore> Tutor<S> {
    /// Create an account and log it in
    pub fn register(&mut self, username: &str, password: &str, confirm_password: &str) -> Result<Identity> {
        let username = validate_credentials(username, password)?;
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(ValidationError::PasswordTooShort(PASSWORD_MIN_LENGTH).into());
        }
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let mut table = self.storage.credentials()?;
        if table.contains_key(&username) {
            return Err(ValidationError::UsernameTaken.into());
        }

        let registered_at = now();
        let record = CredentialRecord {
            user_id: generate_user_id(),
            username: username.clone(),
            password_hash: Some(hash_password(password)?),
            password: None,
            registered_at,
        };
        let identity = Identity {
            user_id: record.user_id.clone(),
            username: username.clone(),
            login_time: registered_at,
        };
        table.insert(username, record);
        self.storage.set_credentials(&table)?;
        self.storage.set_current_identity(&identity)?;

        tracing::info!(user_id = %identity.user_id, "account registered");
        self.enter(identity.clone(), None)?;
        Ok(identity)
    }

    /// Log in to an existing account
    ///
    /// A record still holding a plaintext password is rehashed on success.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Identity> {
        let username = validate_credentials(username, password)?;

        let mut table = self.storage.credentials()?;
        let record = table
            .get_mut(&username)
            .ok_or(ValidationError::UsernameNotFound)?;

        match verify_credential(record, password)? {
            Verification::Rejected => {
                tracing::warn!(%username, "login rejected");
                return Err(TutorError::Auth);
            }
            Verification::AcceptedLegacy => {
                record.password_hash = Some(hash_password(password)?);
                record.password = None;
                let user_id = record.user_id.clone();
                self.storage.set_credentials(&table)?;
                tracing::info!(%user_id, "legacy credential upgraded");
            }
            Verification::Accepted => {}
        }

        let record = table.get(&username).ok_or(ValidationError::UsernameNotFound)?;
        let identity = Identity {
            user_id: record.user_id.clone(),
            username: record.username.clone(),
            login_time: now(),
        };
        self.storage.set_current_identity(&identity)?;

        let profile = self.storage.permanent_profile(&identity.user_id)?;
        if let Some(profile) = &profile {
            self.storage.set_active_profile(profile)?;
        }

        tracing::info!(user_id = %identity.user_id, has_profile = profile.is_some(), "logged in");
        self.enter(identity.clone(), profile)?;
        Ok(identity)
    }

    /// Log out, keeping the permanent profile and the session bundle
    pub fn logout(&mut self) -> Result<()> {
        self.storage.clear_current_identity()?;
        self.storage.clear_active_profile()?;
        if let Some(identity) = &self.identity {
            tracing::info!(user_id = %identity.user_id, "logged out");
        }
        self.leave();
        Ok(())
    }

    /// Delete the identity's chats and quiz history, then log out
    pub fn delete_account(&mut self) -> Result<()> {
        let user_id = self.ensure_authenticated()?.user_id.clone();
        self.storage.remove_session_bundle(&user_id)?;
        tracing::info!(%user_id, "account data deleted");
        self.logout()
    }
}
