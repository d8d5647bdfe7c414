//! Response buffer that decodes console bytes into clean text.
//!
//! Console output is run through a `vte` parser so ANSI escape sequences
//! (colors, cursor movement) never reach prompt classification or marker
//! matching. The parser keeps its state between reads, so multi-byte
//! characters and escapes split across reads are decoded correctly.

use bytes::BytesMut;
use vte::{Parser, Perform};

/// Buffer for accumulating decoded console output.
pub struct ResponseBuffer {
    /// Decoded output since the last take.
    buffer: BytesMut,

    /// Escape sequence parser.
    parser: Parser,
}

impl ResponseBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            parser: Parser::new(),
        }
    }

    /// Feed raw bytes, stripping ANSI escape sequences.
    pub fn extend(&mut self, data: &[u8]) {
        let mut printer = Printer {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut printer, data);
    }

    /// Take the decoded text and reset.
    pub fn take_text(&mut self) -> String {
        let data = self.buffer.split().freeze();
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps printable characters and line control, drops everything else.
struct Printer<'a> {
    out: &'a mut BytesMut,
}

impl Perform for Printer<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.extend_from_slice(&[byte]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let mut buffer = ResponseBuffer::new();
        buffer.extend(b"Please Enter Login Name:");
        assert_eq!(buffer.take_text(), "Please Enter Login Name:");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = ResponseBuffer::new();
        buffer.extend(b"\x1b[32mswitch\x1b[0m>");
        assert_eq!(buffer.take_text(), "switch>");
    }

    #[test]
    fn test_line_endings_kept() {
        let mut buffer = ResponseBuffer::new();
        buffer.extend(b"line one\r\nswitch#");
        assert_eq!(buffer.take_text(), "line one\r\nswitch#");
    }

    #[test]
    fn test_split_escape_sequence() {
        let mut buffer = ResponseBuffer::new();
        buffer.extend(b"switch\x1b[");
        buffer.extend(b"0m#");
        assert_eq!(buffer.take_text(), "switch#");
    }

    #[test]
    fn test_split_utf8_character() {
        let mut buffer = ResponseBuffer::new();
        let text = "caf\u{e9}>".as_bytes();
        buffer.extend(&text[..4]);
        buffer.extend(&text[4..]);
        assert_eq!(buffer.take_text(), "caf\u{e9}>");
    }
}
