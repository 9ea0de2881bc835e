//! Session store
//!
//! In-memory copy of one identity's session bundle. The store keeps the
//! selection invariant (at least one thread exists and the selected id points
//! at one of them) and writes the whole bundle back after every mutation.

use crate::database::{ChatThread, KeyValueStore, PersistenceGateway, SessionBundle};
use crate::error::{TutorError, Result};
use crate::utils::IdGenerator;

/// Chats, selection and quiz history of the logged-in identity
#[derive(Debug, Clone)]
pub struct SessionStore {
    user_id: String,
    bundle: SessionBundle,
    ids: IdGenerator,
}

impl SessionStore {
    /// Load the identity's bundle, synthesizing one empty selected thread if absent
    ///
    /// An unreadable stored bundle is replaced in memory only; the stored
    /// value stays until the next mutation writes over it.
    pub fn load<S: KeyValueStore>(storage: &PersistenceGateway<S>, user_id: &str) -> Result<Self> {
        let (stored, unreadable) = match storage.read_session_bundle(user_id) {
            Ok(stored) => (stored, false),
            Err(TutorError::CorruptState { key, reason }) => {
                tracing::warn!(%key, %reason, "session bundle unreadable, starting empty");
                (None, true)
            }
            Err(e) => return Err(e),
        };
        let synthesized = stored.is_none();
        let bundle = stored.unwrap_or_default();

        let mut session = Self {
            user_id: user_id.to_string(),
            ids: IdGenerator::seeded(bundle.max_id()),
            bundle,
        };

        let repaired = session.ensure_selection();
        if (synthesized || repaired) && !unreadable {
            tracing::debug!(%user_id, synthesized, "session bundle initialised");
            session.persist(storage)?;
        }
        Ok(session)
    }

    /// Write the bundle under the identity's key
    pub fn persist<S: KeyValueStore>(&self, storage: &PersistenceGateway<S>) -> Result<()> {
        storage.set_session_bundle(&self.user_id, &self.bundle)
    }

    /// Restore the selection invariant; returns true if anything changed
    pub fn ensure_selection(&mut self) -> bool {
        if self.bundle.chats.is_empty() {
            let id = self.ids.next_id();
            self.bundle.chats.push(ChatThread::new(id));
            self.bundle.selected_chat_id = Some(id);
            return true;
        }

        let valid = self
            .bundle
            .selected_chat_id
            .is_some_and(|id| self.bundle.chats.iter().any(|c| c.id == id));
        if !valid {
            self.bundle.selected_chat_id = self.bundle.chats.first().map(|c| c.id);
            return true;
        }
        false
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn bundle(&self) -> &SessionBundle {
        &self.bundle
    }

    pub(crate) fn bundle_mut(&mut self) -> &mut SessionBundle {
        &mut self.bundle
    }

    /// Selected thread id; always points at an existing thread
    pub fn selected_chat_id(&self) -> Option<i64> {
        self.bundle.selected_chat_id
    }

    /// Fresh id for a thread, message or quiz result
    pub fn next_id(&mut self) -> i64 {
        self.ids.next_id()
    }

    pub(crate) fn thread_mut(&mut self, id: i64) -> Option<&mut ChatThread> {
        self.bundle.chats.iter_mut().find(|c| c.id == id)
    }
}
