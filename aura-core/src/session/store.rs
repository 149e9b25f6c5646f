//! Chat data structures and the durable session store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Title given to a session before its first user message arrives
pub const DEFAULT_TITLE: &str = "New Chat";

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (user, bot)
    pub role: Role,
    /// Display text; carries the fixed error placeholder on failure
    pub text: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// One persisted conversation
///
/// The serialized form is exactly `{"title": ..., "messages": [...]}` —
/// the on-disk mapping keeps no other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Short display string for the history list
    pub title: String,
    /// Ordered messages, append-only during normal use
    pub messages: Vec<ChatMessage>,
}

impl Session {
    /// Create a new empty session with the default title
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Append a message to the session
    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, text));
    }

    /// Whether the title was never derived or renamed
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

const CHATS_FILE: &str = "allChats.json";
const LAST_CHAT_FILE: &str = "lastChatId";

/// Durable store for the session mapping and the last-active pointer
///
/// Two entries under the data directory: `allChats.json` holds the
/// `sessionId -> Session` mapping, `lastChatId` holds one session id.
#[derive(Debug, Clone)]
pub struct ChatStore {
    data_dir: PathBuf,
}

impl ChatStore {
    /// Create a store rooted at the given data directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the full session mapping
    ///
    /// A missing file yields an empty mapping; unreadable content is logged
    /// and treated as empty rather than failing startup.
    pub fn load_all(&self) -> BTreeMap<String, Session> {
        let path = self.data_dir.join(CHATS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };

        match serde_json::from_str(&content) {
            Ok(chats) => chats,
            Err(e) => {
                warn!("Ignoring corrupt chat store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    /// Overwrite the full session mapping
    pub fn save_all(&self, chats: &BTreeMap<String, Session>) -> crate::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let content = serde_json::to_string(chats)?;
        std::fs::write(self.data_dir.join(CHATS_FILE), content)?;
        Ok(())
    }

    /// Read the last-active session id, if one was recorded
    pub fn last_active_id(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.data_dir.join(LAST_CHAT_FILE)).ok()?;
        let id = raw.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }

    /// Record the last-active session id
    pub fn set_last_active_id(&self, id: &str) -> crate::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(self.data_dir.join(LAST_CHAT_FILE), id)?;
        Ok(())
    }

    /// Remove the last-active pointer
    pub fn clear_last_active_id(&self) -> crate::Result<()> {
        remove_if_present(&self.data_dir.join(LAST_CHAT_FILE))
    }

    /// Remove both the session mapping and the last-active pointer
    pub fn clear_all(&self) -> crate::Result<()> {
        remove_if_present(&self.data_dir.join(CHATS_FILE))?;
        remove_if_present(&self.data_dir.join(LAST_CHAT_FILE))
    }
}

fn remove_if_present(path: &Path) -> crate::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
