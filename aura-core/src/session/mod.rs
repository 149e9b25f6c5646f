//! Session persistence for chat history
//!
//! Chat sessions are stored as one JSON mapping plus a last-active pointer
//! so a reopened client resumes where it left off.

pub mod manager;
pub mod store;

pub use manager::{HistorySummary, SessionManager};
pub use store::{ChatMessage, ChatStore, Role, Session, DEFAULT_TITLE};
