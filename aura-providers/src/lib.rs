//! External service clients for aura-chat
//!
//! This crate wraps the remote answering service and the speech services
//! (transcription and synthesis) behind narrow interfaces.

pub mod ask;
pub mod speech;
pub mod transcription;

pub use ask::{AnswerClient, AnswerProvider, AskError, AskResult, NO_ANSWER_FALLBACK};
pub use speech::{select_voice, strip_pictographs, SpeechError, SpeechSynthesizer};
pub use transcription::{Transcriber, TranscriptionError};
