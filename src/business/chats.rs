//! Chat thread operations
//!
//! Threads are kept newest first. There is always at least one thread and
//! the selection always points at an existing one.

use crate::database::{ChatThread, KeyValueStore, Message, Sender};
use crate::error::{TutorError, Result, ValidationError};
use crate::gateway::{Attachment, ChatRequest, HistoryTurn};
use crate::parser::parse_response;
use crate::utils::truncate_chars;
use crate::{CHAT_TITLE_LENGTH, NEW_CHAT_TITLE};
use super::tutor::Tutor;

/// Title derived from a thread's first user message
///
/// The text is cut as typed, leading spaces included; only an all-blank
/// message falls through to the attachment name.
fn derive_title(text: &str, file_name: Option<&str>) -> String {
    if !text.trim().is_empty() {
        return truncate_chars(text, CHAT_TITLE_LENGTH);
    }
    match file_name {
        Some(name) if !name.trim().is_empty() => truncate_chars(name.trim(), CHAT_TITLE_LENGTH),
        _ => NEW_CHAT_TITLE.to_string(),
    }
}

impl<S: KeyValueStore> Tutor<S> {
    /// All threads, newest first
    pub fn chats(&self) -> Result<&[ChatThread]> {
        Ok(&self.session()?.bundle().chats)
    }

    /// Thread by id
    pub fn chat(&self, id: i64) -> Result<&ChatThread> {
        self.chats()?
            .iter()
            .find(|c| c.id == id)
            .ok_or(TutorError::ChatNotFound(id))
    }

    /// Id of the selected thread
    pub fn selected_chat_id(&self) -> Result<i64> {
        self.session()?
            .selected_chat_id()
            .ok_or(TutorError::NotAuthenticated)
    }

    /// The selected thread
    pub fn selected_chat(&self) -> Result<&ChatThread> {
        self.chat(self.selected_chat_id()?)
    }

    /// Create an empty thread at the front of the list and select it
    pub fn create_thread(&mut self) -> Result<i64> {
        self.with_session(|session| {
            let id = session.next_id();
            let bundle = session.bundle_mut();
            bundle.chats.insert(0, ChatThread::new(id));
            bundle.selected_chat_id = Some(id);
            tracing::debug!(chat_id = id, "thread created");
            Ok(id)
        })
    }

    /// Delete a thread
    ///
    /// Deleting the selected thread selects the first remaining one; deleting
    /// the last thread replaces it with a fresh empty one.
    pub fn delete_thread(&mut self, id: i64) -> Result<()> {
        self.with_session(|session| {
            let bundle = session.bundle_mut();
            let before = bundle.chats.len();
            bundle.chats.retain(|c| c.id != id);
            if bundle.chats.len() == before {
                return Err(TutorError::ChatNotFound(id));
            }
            if bundle.selected_chat_id == Some(id) {
                bundle.selected_chat_id = bundle.chats.first().map(|c| c.id);
            }
            tracing::debug!(chat_id = id, remaining = bundle.chats.len(), "thread deleted");
            Ok(())
        })
    }

    /// Select a thread
    pub fn select_thread(&mut self, id: i64) -> Result<()> {
        self.with_session(|session| {
            let bundle = session.bundle_mut();
            if !bundle.chats.iter().any(|c| c.id == id) {
                return Err(TutorError::ChatNotFound(id));
            }
            bundle.selected_chat_id = Some(id);
            Ok(())
        })
    }

    /// Append a user message; the first one titles the thread
    pub fn append_user_message(&mut self, thread_id: i64, text: &str, file_name: Option<&str>) -> Result<Message> {
        self.with_session(|session| {
            let id = session.next_id();
            let thread = session
                .thread_mut(thread_id)
                .ok_or(TutorError::ChatNotFound(thread_id))?;
            if thread.messages.is_empty() {
                thread.title = derive_title(text, file_name);
            }
            let message = Message {
                id,
                sender: Sender::User,
                text: text.to_string(),
                original_text: None,
                file_name: file_name.map(str::to_string),
                quiz: None,
            };
            thread.messages.push(message.clone());
            Ok(message)
        })
    }

    /// Append an AI reply, splitting off any trailing quiz block
    pub fn append_ai_message(&mut self, thread_id: i64, raw_response: &str) -> Result<Message> {
        let parsed = parse_response(raw_response);
        self.with_session(|session| {
            let id = session.next_id();
            let thread = session
                .thread_mut(thread_id)
                .ok_or(TutorError::ChatNotFound(thread_id))?;
            let message = Message {
                id,
                sender: Sender::Ai,
                text: parsed.display_text,
                original_text: Some(parsed.original_text),
                file_name: None,
                quiz: parsed.quiz,
            };
            thread.messages.push(message.clone());
            Ok(message)
        })
    }

    /// Send a message to the tutor and append its reply
    ///
    /// The last `history_window` messages before this one go along as
    /// context. On gateway failure the user message stays in the thread, no
    /// reply is appended and the error is returned so the caller can retry.
    /// Callers must not overlap sends to the same thread.
    pub async fn send_message(&mut self, thread_id: i64, text: &str, attachment: Option<Attachment>) -> Result<Message> {
        let profile = self.ensure_profile()?;
        if text.trim().is_empty() && attachment.is_none() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let history: Vec<HistoryTurn> = {
            let messages = &self.chat(thread_id)?.messages;
            let start = messages.len().saturating_sub(self.history_window);
            messages[start..].iter().map(HistoryTurn::from).collect()
        };

        let file_name = attachment.as_ref().map(|a| a.file_name.clone());
        self.append_user_message(thread_id, text, file_name.as_deref())?;

        let request = ChatRequest {
            text: text.to_string(),
            level: profile.level,
            level_label: profile.level_label(),
            attachment,
            socratic: self.socratic_mode,
            history,
        };

        tracing::debug!(chat_id = thread_id, history = request.history.len(), "sending chat message");
        let raw = match self.ai.complete_chat(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(chat_id = thread_id, error = %e, "chat completion failed");
                return Err(e);
            }
        };

        self.append_ai_message(thread_id, &raw)
    }
}
