//! Display seam between the exchange controller and the terminal

use aura_core::session::ChatMessage;

/// One row in the session history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Session id
    pub id: String,
    /// Display title (may be empty)
    pub title: String,
    /// Whether this is the session currently displayed
    pub current: bool,
}

/// Renders the conversation and the session history list
///
/// The controller persists through the session manager and then calls this
/// trait; implementations only display.
pub trait ConversationView {
    /// Clear and redraw the full ordered message list
    fn render(&mut self, messages: &[ChatMessage]);

    /// Draw one message at the end of the conversation
    fn append(&mut self, message: &ChatMessage);

    /// Show a transient system line that is never persisted
    fn notice(&mut self, text: &str);

    /// Redraw the session history list, newest first
    fn render_history(&mut self, entries: &[HistoryEntry]);
}
