//! Exchange controller: one question/answer round trip at a time

use crate::view::{ConversationView, HistoryEntry};
use crate::voice::{VoiceAdapter, VoiceError};
use aura_core::session::{ChatMessage, Role, SessionManager};
use aura_providers::AnswerProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fixed text shown when the answering call fails
pub const ANSWER_ERROR_TEXT: &str = "⚠️ Error fetching answer.";

/// Acknowledgement shown after clearing the whole history
pub const CLEARED_NOTICE: &str = "🧹 All chat history has been cleared.";

/// Notice shown when voice input is requested but recognition is unavailable
pub const VOICE_UNAVAILABLE_NOTICE: &str =
    "Speech recognition is not available. Configure voice.transcription first.";

/// Per-session exchange state owned by the controller
///
/// Reset whenever the current session changes, so nothing leaks across a
/// session switch.
#[derive(Debug, Default)]
struct ExchangeContext {
    last_answer: Option<String>,
    voice_input: bool,
    next_seq: u64,
}

impl ExchangeContext {
    fn begin(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Orchestrates exchanges between the user, the session manager, the
/// answering service, and the view
pub struct ExchangeController<V: ConversationView> {
    sessions: SessionManager,
    view: V,
    provider: Arc<dyn AnswerProvider>,
    voice: Option<VoiceAdapter>,
    context: ExchangeContext,
}

impl<V: ConversationView> ExchangeController<V> {
    /// Create a new controller
    pub fn new(
        sessions: SessionManager,
        view: V,
        provider: Arc<dyn AnswerProvider>,
        voice: Option<VoiceAdapter>,
    ) -> Self {
        Self {
            sessions,
            view,
            provider,
            voice,
            context: ExchangeContext::default(),
        }
    }

    /// Read access to the session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Read access to the view
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Resume the last active session, or start a fresh one
    pub fn startup(&mut self) -> aura_core::Result<String> {
        let id = self.sessions.startup()?;
        self.redraw();
        Ok(id)
    }

    /// Start a new empty session and make it current
    pub fn new_chat(&mut self) -> aura_core::Result<String> {
        let id = self.sessions.create_session()?;
        self.context.reset();
        self.redraw();
        Ok(id)
    }

    /// Switch to an existing session; a stale id is a silent no-op
    pub fn open(&mut self, id: &str) -> aura_core::Result<bool> {
        let loaded = self.sessions.load_session(id)?;
        if loaded {
            self.context.reset();
            self.redraw();
        }
        Ok(loaded)
    }

    /// Rename a session; empty titles are a no-op
    pub fn rename(&mut self, id: &str, new_title: &str) -> aura_core::Result<bool> {
        let renamed = self.sessions.rename_session(id, new_title)?;
        if renamed {
            self.refresh_history();
        }
        Ok(renamed)
    }

    /// Delete a session
    ///
    /// Deleting the current session leaves an empty conversation; no
    /// replacement is selected.
    pub fn delete(&mut self, id: &str) -> aura_core::Result<bool> {
        let was_current = self.sessions.current_id() == Some(id);
        let deleted = self.sessions.delete_session(id)?;
        if deleted {
            if was_current {
                self.context.reset();
                self.view.render(&[]);
            }
            self.refresh_history();
        }
        Ok(deleted)
    }

    /// Delete every session and acknowledge with one unpersisted notice
    pub fn clear_all(&mut self) -> aura_core::Result<()> {
        self.sessions.clear_all()?;
        self.context.reset();
        self.view.render(&[]);
        self.refresh_history();
        self.view.notice(CLEARED_NOTICE);
        Ok(())
    }

    /// Run one exchange with typed input
    pub async fn send(&mut self, input: &str) -> aura_core::Result<()> {
        self.exchange(input, false).await
    }

    /// Run one exchange from a recorded question
    ///
    /// Unavailable recognition is surfaced as a notice; runtime recognition
    /// errors abort without one. In both cases no exchange starts.
    pub async fn send_voice(&mut self, audio: &Path) -> aura_core::Result<()> {
        let Some(adapter) = self.voice.as_ref() else {
            self.view.notice(VOICE_UNAVAILABLE_NOTICE);
            return Ok(());
        };

        match adapter.listen(audio).await {
            Ok(text) => self.exchange(&text, true).await,
            Err(VoiceError::RecognitionUnavailable(_)) => {
                self.view.notice(VOICE_UNAVAILABLE_NOTICE);
                Ok(())
            }
            Err(_) => Ok(()),
        }
    }

    /// Speak the most recent answer again
    pub async fn speak_last(&mut self) {
        if let Some(answer) = self.context.last_answer.clone() {
            self.speak(&answer).await;
        }
    }

    async fn exchange(&mut self, input: &str, voice_originated: bool) -> aura_core::Result<()> {
        let question = input.trim();
        if question.is_empty() {
            return Ok(());
        }

        self.context.voice_input = voice_originated;
        let seq = self.context.begin();

        // User message is appended and persisted before the network call
        let origin = self.sessions.save_message(Role::User, question)?;
        self.view.append(&ChatMessage::new(Role::User, question));
        self.refresh_history();

        let outcome = self.provider.ask(question).await;

        let (text, answered) = match outcome {
            Ok(answer) => (answer, true),
            Err(e) => {
                warn!("Answering call failed: {}", e);
                (ANSWER_ERROR_TEXT.to_string(), false)
            }
        };

        // The answer lands in the session that asked, even if the user
        // switched away while waiting
        if !self.sessions.save_message_to(&origin, Role::Bot, &text)? {
            debug!("Dropping answer for deleted session {}", origin);
            return Ok(());
        }
        if self.sessions.current_id() == Some(origin.as_str()) {
            self.view.append(&ChatMessage::new(Role::Bot, &text));
        }
        self.refresh_history();

        if answered {
            self.context.last_answer = Some(text.clone());
            // Only the most recent voice exchange speaks its answer
            if self.context.voice_input && seq == self.context.next_seq {
                self.speak(&text).await;
                self.context.voice_input = false;
            }
        }
        Ok(())
    }

    async fn speak(&mut self, text: &str) {
        if let Some(adapter) = self.voice.as_mut() {
            if let Err(e) = adapter.speak(text).await {
                warn!("Speech synthesis failed: {}", e);
            }
        }
    }

    fn redraw(&mut self) {
        self.view.render(self.sessions.current_messages());
        self.refresh_history();
    }

    fn refresh_history(&mut self) {
        let current = self.sessions.current_id().map(|id| id.to_string());
        let entries: Vec<HistoryEntry> = self
            .sessions
            .history()
            .into_iter()
            .map(|summary| HistoryEntry {
                current: current.as_deref() == Some(summary.id.as_str()),
                id: summary.id,
                title: summary.title,
            })
            .collect();
        self.view.render_history(&entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aura_core::session::ChatStore;
    use aura_providers::{AskError, AskResult};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answering stub fed with a queue of canned outcomes
    struct StubProvider {
        outcomes: Mutex<Vec<AskResult<String>>>,
    }

    impl StubProvider {
        fn answering(answers: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(
                    answers.iter().rev().map(|a| Ok(a.to_string())).collect(),
                ),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(vec![Err(AskError::Api("HTTP 500: boom".to_string()))]),
            })
        }
    }

    #[async_trait]
    impl AnswerProvider for StubProvider {
        async fn ask(&self, _question: &str) -> AskResult<String> {
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("unexpected call".to_string()))
        }
    }

    /// View that records everything it is told to draw
    #[derive(Default)]
    struct RecordingView {
        rendered: Vec<Vec<ChatMessage>>,
        appended: Vec<ChatMessage>,
        notices: Vec<String>,
        history: Vec<Vec<HistoryEntry>>,
    }

    impl ConversationView for RecordingView {
        fn render(&mut self, messages: &[ChatMessage]) {
            self.rendered.push(messages.to_vec());
        }

        fn append(&mut self, message: &ChatMessage) {
            self.appended.push(message.clone());
        }

        fn notice(&mut self, text: &str) {
            self.notices.push(text.to_string());
        }

        fn render_history(&mut self, entries: &[HistoryEntry]) {
            self.history.push(entries.to_vec());
        }
    }

    fn controller(
        temp_dir: &TempDir,
        provider: Arc<dyn AnswerProvider>,
    ) -> ExchangeController<RecordingView> {
        let sessions = SessionManager::new(ChatStore::with_dir(temp_dir.path()));
        ExchangeController::new(sessions, RecordingView::default(), provider, None)
    }

    #[tokio::test]
    async fn test_exchange_success() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi there"]));
        controller.startup().unwrap();

        controller.send("Hello").await.unwrap();

        let messages = controller.sessions().current_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::new(Role::User, "Hello"));
        assert_eq!(messages[1], ChatMessage::new(Role::Bot, "Hi there"));

        assert_eq!(controller.view().appended.len(), 2);
        assert_eq!(controller.view().appended[1].text, "Hi there");
    }

    #[tokio::test]
    async fn test_exchange_failure_appends_error_text() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::failing());
        controller.startup().unwrap();

        controller.send("Hello").await.unwrap();

        let messages = controller.sessions().current_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Bot);
        assert_eq!(messages[1].text, ANSWER_ERROR_TEXT);
    }

    #[tokio::test]
    async fn test_empty_input_is_silent_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&[]));
        controller.startup().unwrap();

        controller.send("").await.unwrap();
        controller.send("   ").await.unwrap();

        assert!(controller.sessions().current_messages().is_empty());
        assert!(controller.view().appended.is_empty());
    }

    #[tokio::test]
    async fn test_exchange_without_session_creates_one() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi"]));

        controller.send("Hello").await.unwrap();

        assert!(controller.sessions().current_id().is_some());
        assert_eq!(controller.sessions().current_messages().len(), 2);
    }

    #[tokio::test]
    async fn test_history_reflects_derived_title() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi"]));
        controller.startup().unwrap();

        controller.send("Hello").await.unwrap();

        let history = controller.view().history.last().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Hello");
        assert!(history[0].current);
    }

    #[tokio::test]
    async fn test_answer_lands_in_originating_session_durably() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi there"]));
        controller.startup().unwrap();

        controller.send("Hello").await.unwrap();
        let origin = controller.sessions().current_id().unwrap().to_string();

        controller.new_chat().unwrap();
        assert!(controller.sessions().current_messages().is_empty());

        let session = controller.sessions().get(&origin).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].text, "Hi there");
    }

    #[tokio::test]
    async fn test_delete_current_renders_empty_conversation() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi"]));
        controller.startup().unwrap();
        controller.send("Hello").await.unwrap();

        let id = controller.sessions().current_id().unwrap().to_string();
        assert!(controller.delete(&id).unwrap());

        assert_eq!(controller.sessions().current_id(), None);
        assert_eq!(controller.view().rendered.last().unwrap().len(), 0);
        assert!(controller.view().history.last().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_emits_notice() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi"]));
        controller.startup().unwrap();
        controller.send("Hello").await.unwrap();

        controller.clear_all().unwrap();

        assert!(controller.sessions().is_empty());
        assert_eq!(controller.view().notices, vec![CLEARED_NOTICE.to_string()]);
        // The notice is not persisted: the store stays empty
        let store = ChatStore::with_dir(temp_dir.path());
        assert!(store.load_all().is_empty());
    }

    #[tokio::test]
    async fn test_open_stale_session_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi"]));
        controller.startup().unwrap();
        controller.send("Hello").await.unwrap();
        let before = controller.view().rendered.len();

        assert!(!controller.open("424242").unwrap());

        // The conversation view was not redrawn
        assert_eq!(controller.view().rendered.len(), before);
    }

    #[tokio::test]
    async fn test_send_voice_without_adapter_notices() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&[]));
        controller.startup().unwrap();

        controller
            .send_voice(Path::new("question.wav"))
            .await
            .unwrap();

        assert_eq!(
            controller.view().notices,
            vec![VOICE_UNAVAILABLE_NOTICE.to_string()]
        );
        assert!(controller.sessions().current_messages().is_empty());
    }

    #[tokio::test]
    async fn test_rename_refreshes_history() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = controller(&temp_dir, StubProvider::answering(&["Hi"]));
        controller.startup().unwrap();
        let id = controller.sessions().current_id().unwrap().to_string();

        assert!(controller.rename(&id, " Trip plan ").unwrap());
        assert_eq!(
            controller.view().history.last().unwrap()[0].title,
            "Trip plan"
        );

        let before = controller.view().history.len();
        assert!(!controller.rename(&id, "   ").unwrap());
        assert_eq!(controller.view().history.len(), before);
    }
}
