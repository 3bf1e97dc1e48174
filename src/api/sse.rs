//! SSE line reassembly, frame parsing, and outbound frame encoding.
//!
//! OpenRouter streams newline-delimited `data:` frames, but the transport
//! fragments them arbitrarily: a chunk can end mid-JSON and the next chunk
//! completes it. [`LineBuffer`] stitches fragments back into complete lines,
//! [`parse_frame`] classifies each line, and the `format_*` functions render
//! the outbound wire format.

use crate::api::models::DeltaChunk;

/// Accumulator for the trailing, not-yet-newline-terminated fragment between
/// chunk deliveries. Holds at most one partial line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    /// Create an empty line buffer.
    pub fn new() -> Self {
        LineBuffer {
            buffer: String::new(),
        }
    }

    /// Append a chunk and drain all complete lines.
    ///
    /// Every piece before a newline is returned, empty lines included, to
    /// preserve sequencing. The piece after the last newline stays buffered
    /// until a later chunk terminates it. No line length limit is imposed.
    pub fn ingest(&mut self, chunk: &str) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        self.buffer.push_str(chunk);
        let mut pieces: Vec<String> = self.buffer.split('\n').map(str::to_string).collect();
        // split() always yields at least one piece
        self.buffer = pieces.pop().unwrap_or_default();
        pieces
    }

    /// The current unterminated fragment.
    pub fn remaining(&self) -> &str {
        &self.buffer
    }
}

/// Result of classifying a single reassembled line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFrame {
    /// A non-empty incremental text delta
    Content(String),
    /// The `[DONE]` sentinel
    Done,
    /// Anything else: non-data lines, empty payloads, truncated JSON,
    /// chunks without delta content
    Ignored,
}

/// Classify one line of upstream SSE output.
///
/// Truncated or otherwise malformed JSON is expected noise from frame
/// fragmentation; it is logged and skipped, never surfaced to the client.
pub fn parse_frame(line: &str) -> ParsedFrame {
    if !line.starts_with("data:") {
        return ParsedFrame::Ignored;
    }
    if line.trim() == "data: [DONE]" {
        return ParsedFrame::Done;
    }

    let payload = line["data:".len()..].trim();
    if payload.is_empty() {
        return ParsedFrame::Ignored;
    }

    match serde_json::from_str::<DeltaChunk>(payload) {
        Ok(chunk) => match chunk.delta_content() {
            Some(content) if !content.is_empty() => ParsedFrame::Content(content.to_string()),
            _ => ParsedFrame::Ignored,
        },
        Err(e) => {
            tracing::warn!(error = %e, line = %line, "Incomplete JSON chunk received");
            ParsedFrame::Ignored
        }
    }
}

fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Format a content delta as an outbound SSE frame.
pub fn format_content_frame(text: &str) -> String {
    format!("data: {{\"content\": {}}}\n\n", json_string(text))
}

/// Format an error notice as an outbound SSE frame. The orchestrator always
/// terminates the stream with a done frame right after one of these.
pub fn format_error_frame(message: &str) -> String {
    format!("data: {{\"error\": {}}}\n\n", json_string(message))
}

/// Format the stream-terminating sentinel frame.
pub fn format_done_frame() -> String {
    "data: [DONE]\n\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ingest_complete_line() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.ingest("data: hello\n");
        assert_eq!(lines, vec!["data: hello"]);
        assert_eq!(buffer.remaining(), "");
    }

    #[test]
    fn test_ingest_keeps_partial_line() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.ingest("data: hel");
        assert!(lines.is_empty());
        assert_eq!(buffer.remaining(), "data: hel");

        let lines = buffer.ingest("lo\ndata: wor");
        assert_eq!(lines, vec!["data: hello"]);
        assert_eq!(buffer.remaining(), "data: wor");
    }

    #[test]
    fn test_ingest_preserves_empty_lines() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.ingest("a\n\nb\n");
        assert_eq!(lines, vec!["a", "", "b"]);
        assert_eq!(buffer.remaining(), "");
    }

    #[test]
    fn test_ingest_empty_chunk_is_noop() {
        let mut buffer = LineBuffer::new();
        buffer.ingest("partial");

        let lines = buffer.ingest("");
        assert!(lines.is_empty());
        assert_eq!(buffer.remaining(), "partial");
    }

    #[test]
    fn test_parse_content_frame() {
        let frame = parse_frame(r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#);
        assert_eq!(frame, ParsedFrame::Content("hi".to_string()));
    }

    #[test]
    fn test_parse_done_frame() {
        assert_eq!(parse_frame("data: [DONE]"), ParsedFrame::Done);
        // Trailing whitespace (e.g. a stripped \r) still matches
        assert_eq!(parse_frame("data: [DONE] "), ParsedFrame::Done);
    }

    #[test]
    fn test_parse_non_data_line_ignored() {
        assert_eq!(parse_frame(": keep-alive comment"), ParsedFrame::Ignored);
        assert_eq!(parse_frame(""), ParsedFrame::Ignored);
        assert_eq!(parse_frame("event: message"), ParsedFrame::Ignored);
    }

    #[test]
    fn test_parse_empty_payload_ignored() {
        assert_eq!(parse_frame("data:"), ParsedFrame::Ignored);
        assert_eq!(parse_frame("data:   "), ParsedFrame::Ignored);
    }

    #[test]
    fn test_parse_truncated_json_ignored() {
        let frame = parse_frame(r#"data: {"choices":[{"del"#);
        assert_eq!(frame, ParsedFrame::Ignored);
    }

    #[test]
    fn test_parse_missing_content_ignored() {
        assert_eq!(parse_frame(r#"data: {"choices":[]}"#), ParsedFrame::Ignored);
        assert_eq!(
            parse_frame(r#"data: {"choices":[{"delta":{}}]}"#),
            ParsedFrame::Ignored
        );
        assert_eq!(
            parse_frame(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            ParsedFrame::Ignored
        );
    }

    #[test]
    fn test_parse_unicode_content() {
        let frame = parse_frame(r#"data: {"choices":[{"delta":{"content":"ürün ✓"}}]}"#);
        assert_matches!(frame, ParsedFrame::Content(text) if text == "ürün ✓");
    }

    #[test]
    fn test_format_content_frame_exact_bytes() {
        assert_eq!(
            format_content_frame("hi"),
            "data: {\"content\": \"hi\"}\n\n"
        );
    }

    #[test]
    fn test_format_content_frame_escapes_text() {
        assert_eq!(
            format_content_frame("line\n\"quoted\""),
            "data: {\"content\": \"line\\n\\\"quoted\\\"\"}\n\n"
        );
    }

    #[test]
    fn test_format_error_frame_exact_bytes() {
        assert_eq!(
            format_error_frame("boom"),
            "data: {\"error\": \"boom\"}\n\n"
        );
    }

    #[test]
    fn test_format_done_frame_exact_bytes() {
        assert_eq!(format_done_frame(), "data: [DONE]\n\n");
    }

    #[test]
    fn test_parse_then_format_round() {
        let frame = parse_frame(r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#);
        let ParsedFrame::Content(text) = frame else {
            panic!("expected content frame");
        };
        assert_eq!(format_content_frame(&text), "data: {\"content\": \"hi\"}\n\n");
    }
}
