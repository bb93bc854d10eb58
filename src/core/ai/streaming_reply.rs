//! Live-updating chat reply for a streamed AI answer.
//!
//! The command posts a placeholder, feeds every chunk through [`StreamingReply::push`]
//! and edits the placeholder whenever `push` hands back new content. Discord
//! rejects messages over 2000 characters, so long answers end up as a file.

/// Answers longer than this (in characters) are sent as a file.
pub const MESSAGE_LIMIT: usize = 1900;

/// Edit the message every this many chunks to stay clear of rate limits.
pub const EDIT_EVERY: usize = 10;

pub const CURSOR: &str = "▌";

pub const TOO_LONG_NOTICE: &str =
    "Response is too long to send it on Discord. Soon, file with full response will be provided.";

pub const FILE_FAILED_NOTICE: &str =
    "Response is too long to send it on Discord. Error while making a file with full response.";

#[derive(Debug, PartialEq, Eq)]
pub enum FinalReply {
    /// Replace the placeholder with this text.
    Text(String),
    /// Too long for a message; upload this text as a file.
    File(String),
}

#[derive(Debug, Default)]
pub struct StreamingReply {
    text: String,
    chars: usize,
    chunks: usize,
    notice_sent: bool,
}

impl StreamingReply {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the placeholder message shows before any text arrives.
    pub fn placeholder() -> &'static str {
        CURSOR
    }

    /// Adds a chunk. Returns the new message content when an edit is due.
    pub fn push(&mut self, chunk: &str) -> Option<String> {
        self.text.push_str(chunk);
        self.chars += chunk.chars().count();
        self.chunks += 1;

        if self.chars <= MESSAGE_LIMIT {
            if self.chunks % EDIT_EVERY == 0 {
                return Some(format!("{}{}", self.text, CURSOR));
            }
            return None;
        }

        if !self.notice_sent {
            self.notice_sent = true;
            return Some(TOO_LONG_NOTICE.to_string());
        }
        None
    }

    pub fn finish(self) -> FinalReply {
        if self.chars <= MESSAGE_LIMIT {
            FinalReply::Text(self.text)
        } else {
            FinalReply::File(self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_every_tenth_chunk() {
        let mut reply = StreamingReply::new();
        for i in 1..EDIT_EVERY {
            assert_eq!(reply.push("a"), None, "chunk {}", i);
        }
        assert_eq!(reply.push("a"), Some(format!("{}{}", "a".repeat(10), CURSOR)));
    }

    #[test]
    fn test_short_answer_finishes_as_text() {
        let mut reply = StreamingReply::new();
        reply.push("Hello ");
        reply.push("world");
        assert_eq!(reply.finish(), FinalReply::Text("Hello world".to_string()));
    }

    #[test]
    fn test_notice_is_sent_once_when_limit_is_crossed() {
        let mut reply = StreamingReply::new();
        assert_eq!(reply.push(&"x".repeat(MESSAGE_LIMIT)), None);
        assert_eq!(reply.push("y"), Some(TOO_LONG_NOTICE.to_string()));
        for _ in 0..30 {
            assert_eq!(reply.push("z"), None);
        }
        match reply.finish() {
            FinalReply::File(text) => assert_eq!(text.len(), MESSAGE_LIMIT + 31),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn test_limit_counts_characters() {
        let mut reply = StreamingReply::new();
        // 1900 two-byte characters are still within the limit.
        reply.push(&"é".repeat(MESSAGE_LIMIT));
        assert!(matches!(reply.finish(), FinalReply::Text(_)));
    }
}
