pub mod gemini_client;
pub mod sse;

pub use gemini_client::GeminiClient;
