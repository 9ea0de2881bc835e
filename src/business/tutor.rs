//! Main Tutor API
//!
//! `Tutor` owns the persistence gateway, the AI gateway and the state of the
//! logged-in learner. Operations are grouped by concern in the sibling
//! modules (`account`, `profile`, `chats`, `quiz`, `report`).

use crate::config::TutorConfig;
use crate::database::{Identity, KeyValueStore, PersistenceGateway, Profile, StoredProfile};
use crate::error::{TutorError, Result};
use crate::gateway::AiGateway;
use crate::localization::Translations;
use super::profile::compute_status;
use super::session::SessionStore;

/// Where the learner is in the login flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No identity
    Unauthenticated,
    /// Logged in, onboarding not completed
    NoProfile,
    /// Logged in with a profile
    Ready,
}

/// Main tutor interface
pub struct Tutor<S: KeyValueStore> {
    pub(crate) storage: PersistenceGateway<S>,
    pub(crate) ai: Box<dyn AiGateway>,
    pub(crate) translations: Translations,
    pub(crate) identity: Option<Identity>,
    pub(crate) profile: Option<StoredProfile>,
    pub(crate) session: Option<SessionStore>,
    pub(crate) socratic_mode: bool,
    pub(crate) history_window: usize,
}

impl<S: KeyValueStore> Tutor<S> {
    /// Create a tutor over a store, restoring a previous login if one is saved
    pub fn new(store: S, ai: impl AiGateway + 'static) -> Result<Self> {
        Self::with_config(store, ai, &TutorConfig::default())
    }

    /// Create a tutor with explicit configuration
    pub fn with_config(store: S, ai: impl AiGateway + 'static, config: &TutorConfig) -> Result<Self> {
        let mut tutor = Self {
            storage: PersistenceGateway::new(store),
            ai: Box::new(ai),
            translations: Translations::for_language(&config.language)?,
            identity: None,
            profile: None,
            session: None,
            socratic_mode: true,
            history_window: config.history_window,
        };
        tutor.restore()?;
        Ok(tutor)
    }

    /// Re-enter the saved login, if any
    ///
    /// The permanent profile wins over the active-session copy when both exist.
    fn restore(&mut self) -> Result<()> {
        let Some(identity) = self.storage.current_identity()? else {
            return Ok(());
        };

        let profile = match self.storage.permanent_profile(&identity.user_id)? {
            Some(profile) => Some(profile),
            None => self
                .storage
                .active_profile()?
                .filter(|p| p.user_id == identity.user_id),
        };

        tracing::info!(user_id = %identity.user_id, has_profile = profile.is_some(), "login restored");
        self.enter(identity, profile)
    }

    /// Install an authenticated identity and load its session
    pub(crate) fn enter(&mut self, identity: Identity, profile: Option<StoredProfile>) -> Result<()> {
        let session = SessionStore::load(&self.storage, &identity.user_id)?;
        self.identity = Some(identity);
        self.profile = profile;
        self.session = Some(session);
        Ok(())
    }

    /// Drop all in-memory learner state
    pub(crate) fn leave(&mut self) {
        self.identity = None;
        self.profile = None;
        self.session = None;
    }

    /// Current position in the login flow
    pub fn state(&self) -> AuthState {
        match (&self.identity, &self.profile) {
            (None, _) => AuthState::Unauthenticated,
            (Some(_), None) => AuthState::NoProfile,
            (Some(_), Some(_)) => AuthState::Ready,
        }
    }

    /// Logged-in identity
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Profile with grade progression applied as of now
    pub fn profile(&self) -> Option<Profile> {
        compute_status(self.profile.as_ref())
    }

    /// Session store of the logged-in identity
    pub fn session(&self) -> Result<&SessionStore> {
        self.session.as_ref().ok_or(TutorError::NotAuthenticated)
    }

    /// Borrow the persistence gateway
    pub fn storage(&self) -> &PersistenceGateway<S> {
        &self.storage
    }

    /// Whether chat replies guide with questions rather than answer directly
    pub fn socratic_mode(&self) -> bool {
        self.socratic_mode
    }

    pub fn set_socratic_mode(&mut self, enabled: bool) {
        self.socratic_mode = enabled;
    }

    /// Message catalog
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Switch the message catalog language
    pub fn set_language(&mut self, lang: &str) -> Result<()> {
        self.translations.set_language(lang)
    }

    /// Localized text for an error
    pub fn error_message(&self, err: &TutorError) -> String {
        err.user_message(&self.translations)
    }

    /// Ensure someone is logged in
    pub(crate) fn ensure_authenticated(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or(TutorError::NotAuthenticated)
    }

    /// Ensure the learner has a profile
    pub(crate) fn ensure_profile(&self) -> Result<Profile> {
        self.ensure_authenticated()?;
        self.profile().ok_or(TutorError::ProfileRequired)
    }

    /// Run a mutation against the session and persist the result
    ///
    /// Every change to chats, selection or quiz history goes through here, so
    /// the stored bundle always matches memory after the call returns.
    pub(crate) fn with_session<T>(&mut self, f: impl FnOnce(&mut SessionStore) -> Result<T>) -> Result<T> {
        let session = self.session.as_mut().ok_or(TutorError::NotAuthenticated)?;
        let result = f(session);
        session.ensure_selection();
        session.persist(&self.storage)?;
        result
    }
}
