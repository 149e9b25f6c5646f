//! Session manager for handling multiple chat sessions

use super::store::{ChatMessage, ChatStore, Role, Session};
use std::collections::BTreeMap;
use tracing::debug;

/// Maximum number of characters of the first user message kept as a title
const TITLE_MAX_CHARS: usize = 30;

/// Summary of one session for history display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    /// Session id
    pub id: String,
    /// Display title
    pub title: String,
}

/// Manages chat sessions and the current-session pointer
///
/// Holds the in-memory mirror of the durable store. This layer never touches
/// rendering; callers redraw after mutating calls.
#[derive(Debug)]
pub struct SessionManager {
    store: ChatStore,
    chats: BTreeMap<String, Session>,
    current_id: Option<String>,
}

impl SessionManager {
    /// Create a new session manager over a store
    pub fn new(store: ChatStore) -> Self {
        Self {
            store,
            chats: BTreeMap::new(),
            current_id: None,
        }
    }

    /// Load persisted sessions and resolve the last-active pointer
    ///
    /// A missing or dangling pointer falls back to creating a fresh session.
    /// Returns the id of the session that became current.
    pub fn startup(&mut self) -> crate::Result<String> {
        self.chats = self.store.load_all();

        match self.store.last_active_id() {
            Some(id) if self.chats.contains_key(&id) => {
                self.current_id = Some(id.clone());
                Ok(id)
            }
            Some(stale) => {
                debug!("Last-active session {} no longer exists", stale);
                self.create_session()
            }
            None => self.create_session(),
        }
    }

    /// Create a fresh session and make it current
    pub fn create_session(&mut self) -> crate::Result<String> {
        let id = self.next_id();
        self.chats.insert(id.clone(), Session::new());
        self.store.save_all(&self.chats)?;
        self.store.set_last_active_id(&id)?;
        self.current_id = Some(id.clone());
        Ok(id)
    }

    /// Make an existing session current
    ///
    /// A stale id (already deleted) is a silent no-op and returns `false`.
    pub fn load_session(&mut self, id: &str) -> crate::Result<bool> {
        if !self.chats.contains_key(id) {
            return Ok(false);
        }
        self.store.set_last_active_id(id)?;
        self.current_id = Some(id.to_string());
        Ok(true)
    }

    /// Append a message to the current session, creating one if necessary
    ///
    /// The first user message of a default-titled session becomes its title,
    /// truncated to 30 characters with a trailing ellipsis marker.
    /// Returns the id of the session the message landed in.
    pub fn save_message(&mut self, role: Role, text: &str) -> crate::Result<String> {
        let id = match self.current_id.clone() {
            Some(id) if self.chats.contains_key(&id) => id,
            _ => self.create_session()?,
        };
        self.append(&id, role, text)?;
        Ok(id)
    }

    /// Append a message to an explicit session
    ///
    /// Used when an exchange completes after the user switched or deleted
    /// sessions: the answer lands where the question was asked. Returns
    /// `false` when the session no longer exists.
    pub fn save_message_to(&mut self, id: &str, role: Role, text: &str) -> crate::Result<bool> {
        if !self.chats.contains_key(id) {
            return Ok(false);
        }
        self.append(id, role, text)?;
        Ok(true)
    }

    fn append(&mut self, id: &str, role: Role, text: &str) -> crate::Result<()> {
        let session = self
            .chats
            .get_mut(id)
            .ok_or_else(|| crate::Error::Session(format!("no session {}", id)))?;
        session.push(role, text);
        if role == Role::User && session.has_default_title() {
            session.title = derive_title(text);
        }
        self.store.save_all(&self.chats)
    }

    /// Rename a session; empty or whitespace-only titles are a no-op
    pub fn rename_session(&mut self, id: &str, new_title: &str) -> crate::Result<bool> {
        let title = new_title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        let Some(session) = self.chats.get_mut(id) else {
            return Ok(false);
        };
        session.title = title.to_string();
        self.store.save_all(&self.chats)?;
        Ok(true)
    }

    /// Delete a session
    ///
    /// Deleting the current session clears both the current pointer and the
    /// last-active pointer; no replacement is selected.
    pub fn delete_session(&mut self, id: &str) -> crate::Result<bool> {
        if self.chats.remove(id).is_none() {
            return Ok(false);
        }
        self.store.save_all(&self.chats)?;
        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
            self.store.clear_last_active_id()?;
        }
        Ok(true)
    }

    /// Remove every session and the last-active pointer
    pub fn clear_all(&mut self) -> crate::Result<()> {
        self.store.clear_all()?;
        self.chats.clear();
        self.current_id = None;
        Ok(())
    }

    /// Id of the current session, if any
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Messages of the current session, empty when none is current
    pub fn current_messages(&self) -> &[ChatMessage] {
        self.current_id
            .as_ref()
            .and_then(|id| self.chats.get(id))
            .map_or(&[], |session| session.messages.as_slice())
    }

    /// Get a session by id
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.chats.get(id)
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether no sessions are stored
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// History summaries, newest session first
    ///
    /// Ids are millisecond creation timestamps, so descending id order is
    /// descending creation order.
    pub fn history(&self) -> Vec<HistorySummary> {
        self.chats
            .iter()
            .rev()
            .map(|(id, session)| HistorySummary {
                id: id.clone(),
                title: session.title.clone(),
            })
            .collect()
    }

    fn next_id(&self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.chats.contains_key(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

fn derive_title(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
    if text.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}
