pub mod ai_service;
pub mod streaming_reply;

pub use ai_service::{AiError, AiProvider, AiService, TextStream};
pub use streaming_reply::{FinalReply, StreamingReply};
