//! Typed access to the persisted app state
//!
//! Every value is a JSON document under a key from [`super::keys`]. Reads of
//! missing keys yield `None`; unparsable JSON yields `TutorError::CorruptState`
//! from the strict readers and is treated as absent by the lenient ones.

use serde::Serialize;
use serde::de::DeserializeOwned;
use crate::error::{TutorError, Result};
use super::keys;
use super::models::{CredentialTable, Identity, SessionBundle, StoredProfile};
use super::store::KeyValueStore;

/// Persistence gateway over a key-value store
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and parse a key; corrupt JSON is an error
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| TutorError::CorruptState {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Read and parse a key; corrupt JSON is logged and treated as absent
    pub fn read_or_absent<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read(key) {
            Err(TutorError::CorruptState { key, reason }) => {
                tracing::warn!(%key, %reason, "discarding unreadable stored value");
                Ok(None)
            }
            other => other,
        }
    }

    /// Serialize and write a value
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| TutorError::StorageError(format!("Failed to serialize '{}': {}", key, e)))?;
        self.store.set(key, &json)?;
        tracing::debug!(%key, bytes = json.len(), "stored");
        Ok(())
    }

    /// Delete a key
    pub fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key)?;
        tracing::debug!(%key, "removed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Named slots
    // ------------------------------------------------------------------

    pub fn current_identity(&self) -> Result<Option<Identity>> {
        self.read_or_absent(keys::CURRENT_IDENTITY)
    }

    pub fn set_current_identity(&self, identity: &Identity) -> Result<()> {
        self.write(keys::CURRENT_IDENTITY, identity)
    }

    pub fn clear_current_identity(&self) -> Result<()> {
        self.remove(keys::CURRENT_IDENTITY)
    }

    pub fn active_profile(&self) -> Result<Option<StoredProfile>> {
        self.read_or_absent(keys::ACTIVE_SESSION_PROFILE)
    }

    pub fn set_active_profile(&self, profile: &StoredProfile) -> Result<()> {
        self.write(keys::ACTIVE_SESSION_PROFILE, profile)
    }

    pub fn clear_active_profile(&self) -> Result<()> {
        self.remove(keys::ACTIVE_SESSION_PROFILE)
    }

    pub fn permanent_profile(&self, user_id: &str) -> Result<Option<StoredProfile>> {
        self.read_or_absent(&keys::permanent_profile(user_id))
    }

    pub fn set_permanent_profile(&self, profile: &StoredProfile) -> Result<()> {
        self.write(&keys::permanent_profile(&profile.user_id), profile)
    }

    /// Credential table; a corrupt table reads as empty
    pub fn credentials(&self) -> Result<CredentialTable> {
        Ok(self.read_or_absent(keys::CREDENTIALS)?.unwrap_or_default())
    }

    pub fn set_credentials(&self, table: &CredentialTable) -> Result<()> {
        self.write(keys::CREDENTIALS, table)
    }

    pub fn session_bundle(&self, user_id: &str) -> Result<Option<SessionBundle>> {
        self.read_or_absent(&keys::session_bundle(user_id))
    }

    /// Session bundle; an unreadable one is `CorruptState`
    pub fn read_session_bundle(&self, user_id: &str) -> Result<Option<SessionBundle>> {
        self.read(&keys::session_bundle(user_id))
    }

    pub fn set_session_bundle(&self, user_id: &str, bundle: &SessionBundle) -> Result<()> {
        self.write(&keys::session_bundle(user_id), bundle)
    }

    pub fn remove_session_bundle(&self, user_id: &str) -> Result<()> {
        self.remove(&keys::session_bundle(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::database::MemoryStore;
    use crate::database::models::ChatThread;

    fn gateway() -> PersistenceGateway<MemoryStore> {
        PersistenceGateway::new(MemoryStore::new())
    }

    #[test]
    fn test_missing_key_is_absent() {
        let gw = gateway();
        assert!(gw.current_identity().unwrap().is_none());
        assert!(gw.credentials().unwrap().is_empty());
        assert!(gw.session_bundle("user_1").unwrap().is_none());
    }

    #[test]
    fn test_strict_read_reports_corruption() {
        let gw = gateway();
        gw.store().set("tutor_users", "{not json").unwrap();
        let err = gw.read::<CredentialTable>("tutor_users").unwrap_err();
        assert!(matches!(err, TutorError::CorruptState { ref key, .. } if key == "tutor_users"));
    }

    #[test]
    fn test_lenient_read_recovers_corruption() {
        let gw = gateway();
        gw.store().set("tutor_users", "{not json").unwrap();
        gw.store().set("tutor_currentUser", "[]").unwrap();
        assert!(gw.credentials().unwrap().is_empty());
        assert!(gw.current_identity().unwrap().is_none());
    }

    #[test]
    fn test_identity_slot() {
        let gw = gateway();
        let identity = Identity {
            user_id: "user_1".into(),
            username: "budi".into(),
            login_time: Utc::now(),
        };
        gw.set_current_identity(&identity).unwrap();
        assert_eq!(gw.current_identity().unwrap(), Some(identity));
        gw.clear_current_identity().unwrap();
        assert!(gw.current_identity().unwrap().is_none());
    }

    #[test]
    fn test_bundle_slot_uses_user_key() {
        let gw = gateway();
        let bundle = SessionBundle {
            chats: vec![ChatThread::new(1)],
            selected_chat_id: Some(1),
            quiz_history: vec![],
        };
        gw.set_session_bundle("user_9", &bundle).unwrap();
        assert!(gw.store().get("mentorku-data-user_9").unwrap().is_some());
        assert_eq!(gw.session_bundle("user_9").unwrap(), Some(bundle));
        gw.remove_session_bundle("user_9").unwrap();
        assert!(gw.session_bundle("user_9").unwrap().is_none());
    }
}
