//! Exchange orchestration for aura-chat
//!
//! Ties the session manager, the answering service, the conversation view,
//! and the voice adapter together into question/answer exchanges.

pub mod exchange;
pub mod view;
pub mod voice;

pub use exchange::{ExchangeController, ANSWER_ERROR_TEXT, CLEARED_NOTICE};
pub use view::{ConversationView, HistoryEntry};
pub use voice::{VoiceAdapter, VoiceError};
