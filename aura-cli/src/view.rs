//! Console implementation of the conversation view

use aura_chat::{ConversationView, HistoryEntry};
use aura_core::session::{ChatMessage, Role};
use console::style;

/// Title shown for sessions whose title is empty
const UNTITLED: &str = "Untitled Chat";

/// Renders the conversation as role-labelled lines and keeps the latest
/// history snapshot for the `/history` command
#[derive(Default)]
pub struct ConsoleView {
    history: Vec<HistoryEntry>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    fn print_message(&self, message: &ChatMessage) {
        let label = match message.role {
            Role::User => style("you ").cyan().bold(),
            Role::Bot => style("aura").green().bold(),
        };
        println!("{} {}", label, message.text);
    }

    /// Print the history snapshot, newest session first
    pub fn show_history(&self) {
        if self.history.is_empty() {
            println!("No saved chats.");
            return;
        }
        for (index, entry) in self.history.iter().enumerate() {
            let marker = if entry.current { "*" } else { " " };
            let title = if entry.title.is_empty() {
                UNTITLED
            } else {
                entry.title.as_str()
            };
            println!(
                "{} {:>2}. {}  {}",
                style(marker).green().bold(),
                index + 1,
                title,
                style(&entry.id).dim()
            );
        }
    }

}

impl ConversationView for ConsoleView {
    fn render(&mut self, messages: &[ChatMessage]) {
        println!();
        if messages.is_empty() {
            println!("{}", style("(empty conversation)").dim());
        }
        for message in messages {
            self.print_message(message);
        }
    }

    fn append(&mut self, message: &ChatMessage) {
        self.print_message(message);
    }

    fn notice(&mut self, text: &str) {
        println!("{}", style(text).blue());
    }

    fn render_history(&mut self, entries: &[HistoryEntry]) {
        // The console has no persistent sidebar; keep the latest snapshot
        // and print it on demand
        self.history = entries.to_vec();
    }
}
