// Minimal server-sent-events reader for streamed model responses.
//
// Network chunks do not line up with events: one chunk can hold several
// events, or stop in the middle of a line (even in the middle of a UTF-8
// character). The decoder keeps the unfinished tail and only hands out
// complete `data:` payloads.

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes and returns the `data:` payloads of every line completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.strip_prefix(' ').unwrap_or(data);
                if !data.is_empty() && data != "[DONE]" {
                    payloads.push(data.to_string());
                }
            }
        }
        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_events() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: {\"a\":1}\r\n\r\ndata: {\"a\":2}\r\n\r\n");
        assert_eq!(out, vec![r#"{"a":1}"#, r#"{"a":2}"#]);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"te").is_empty());
        assert!(decoder.feed(b"xt\":\"hi\"}").is_empty());
        assert_eq!(decoder.feed(b"\r\n\r\n"), vec![r#"{"text":"hi"}"#]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let event = "data: zażółć\n".as_bytes();
        let (head, tail) = event.split_at(9);
        assert!(decoder.feed(head).is_empty());
        assert_eq!(decoder.feed(tail), vec!["zażółć"]);
    }

    #[test]
    fn test_other_fields_and_done_marker_are_ignored() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b": keep-alive\nevent: message\nid: 4\ndata: [DONE]\ndata:x\n");
        assert_eq!(out, vec!["x"]);
    }
}
