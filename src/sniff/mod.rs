//! Sniff module - Content type detection from leading bytes
//!
//! Looks at no more than the first [`SNIFF_LEN`] bytes, walks an ordered
//! signature table and returns the MIME type of the first rule that matches.
//! Detection never fails: unknown content is `application/octet-stream`.
//!
//! # Example
//!
//! ```
//! assert_eq!(sniffhash::classify(b"GIF89a\x01\x00"), "image/gif");
//! assert_eq!(sniffhash::classify(b""), "application/octet-stream");
//! ```

pub mod signatures;

use std::io::{self, Read};

pub use signatures::{MaskedPattern, SignatureRule, SIGNATURES};

/// Maximum number of bytes inspected
pub const SNIFF_LEN: usize = 512;

/// Returned when no rule matches
pub const FALLBACK_MIME: &str = "application/octet-stream";
pub const HTML_MIME: &str = "text/html; charset=utf-8";
pub const TEXT_MIME: &str = "text/plain; charset=utf-8";
pub const MP4_MIME: &str = "video/mp4";

/// Whitespace bytes skipped before HTML/XML detection: TAB, LF, FF, CR, SP
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

/// Bytes that may close an HTML tag name
pub fn is_tag_terminator(b: u8) -> bool {
    matches!(b, b' ' | b'>')
}

/// Index of the first non-whitespace byte, `data.len()` if there is none
pub fn first_non_whitespace(data: &[u8]) -> usize {
    data.iter()
        .position(|&b| !is_whitespace(b))
        .unwrap_or(data.len())
}

/// Evaluates an ordered, immutable rule table
#[derive(Debug, Clone, Copy)]
pub struct Sniffer<'r> {
    rules: &'r [SignatureRule],
}

impl Default for Sniffer<'static> {
    fn default() -> Self {
        Self { rules: SIGNATURES }
    }
}

impl<'r> Sniffer<'r> {
    /// Use a custom table. Rules are tried in slice order.
    pub fn new(rules: &'r [SignatureRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'r [SignatureRule] {
        self.rules
    }

    /// Classify `data`, first match wins
    pub fn classify(&self, data: &[u8]) -> &'static str {
        let data = &data[..data.len().min(SNIFF_LEN)];
        let first_non_ws = first_non_whitespace(data);

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.matches(data, first_non_ws) {
                let mime = rule.mime();
                tracing::trace!(rule = index, mime, "signature matched");
                return mime;
            }
        }
        FALLBACK_MIME
    }

    /// Read up to [`SNIFF_LEN`] bytes from `reader` and classify them
    pub fn classify_reader<R: Read>(&self, reader: R) -> io::Result<&'static str> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        reader.take(SNIFF_LEN as u64).read_to_end(&mut head)?;
        Ok(self.classify(&head))
    }
}

/// Classify with the built-in table
pub fn classify(data: &[u8]) -> &'static str {
    Sniffer::default().classify(data)
}

/// Classify the head of a reader with the built-in table
pub fn classify_reader<R: Read>(reader: R) -> io::Result<&'static str> {
    Sniffer::default().classify_reader(reader)
}
