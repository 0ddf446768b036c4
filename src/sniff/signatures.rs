//! Signature table for content sniffing.
//!
//! The table is evaluated top to bottom and the first hit wins, so order is
//! priority: specific patterns sit above general ones and [`SignatureRule::Text`]
//! is always last. Patterns follow the WHATWG MIME sniffing tables plus a set
//! of extra archive, media and game formats.

use super::{is_tag_terminator, HTML_MIME, MP4_MIME, TEXT_MIME};
use crate::error::SignatureError;

/// A byte pattern compared under a per-byte mask.
///
/// Mask `0xFF` requires an exact byte, `0xDF` compares ASCII letters
/// case-insensitively, `0x00` ignores the byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedPattern {
    pattern: &'static [u8],
    mask: &'static [u8],
    skip_leading_whitespace: bool,
}

impl MaskedPattern {
    /// # Panics
    ///
    /// Panics when `pattern` and `mask` differ in length. In a `static`
    /// table this is a compile error; use [`MaskedPattern::try_new`] for
    /// patterns built at runtime.
    pub const fn new(
        pattern: &'static [u8],
        mask: &'static [u8],
        skip_leading_whitespace: bool,
    ) -> Self {
        assert!(
            pattern.len() == mask.len(),
            "masked signature pattern and mask must be the same length"
        );
        Self {
            pattern,
            mask,
            skip_leading_whitespace,
        }
    }

    /// Fallible [`MaskedPattern::new`]
    pub fn try_new(
        pattern: &'static [u8],
        mask: &'static [u8],
        skip_leading_whitespace: bool,
    ) -> Result<Self, SignatureError> {
        if pattern.len() != mask.len() {
            return Err(SignatureError::MaskLength {
                pattern_len: pattern.len(),
                mask_len: mask.len(),
            });
        }
        Ok(Self {
            pattern,
            mask,
            skip_leading_whitespace,
        })
    }

    pub fn pattern(&self) -> &'static [u8] {
        self.pattern
    }

    pub fn mask(&self) -> &'static [u8] {
        self.mask
    }

    pub fn skips_leading_whitespace(&self) -> bool {
        self.skip_leading_whitespace
    }

    fn matches(&self, data: &[u8], first_non_ws: usize) -> bool {
        let data = if self.skip_leading_whitespace {
            &data[first_non_ws.min(data.len())..]
        } else {
            data
        };
        if data.len() < self.pattern.len() {
            return false;
        }
        self.pattern
            .iter()
            .zip(self.mask)
            .zip(data)
            .all(|((&p, &m), &d)| d & m == p)
    }
}

/// One entry of the sniffing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRule {
    /// Data starts with `signature`
    Exact {
        signature: &'static [u8],
        mime: &'static str,
    },
    /// Data matches a masked pattern
    Masked {
        pattern: MaskedPattern,
        mime: &'static str,
    },
    /// HTML tag after leading whitespace, case-insensitive, followed by a
    /// space or `>`
    Html { tag: &'static [u8] },
    /// ISO base media `ftyp` box listing an `mp4` brand
    Mp4,
    /// Anything without binary control bytes
    Text,
}

impl SignatureRule {
    pub const fn exact(signature: &'static [u8], mime: &'static str) -> Self {
        SignatureRule::Exact { signature, mime }
    }

    pub const fn masked(pattern: &'static [u8], mask: &'static [u8], mime: &'static str) -> Self {
        SignatureRule::Masked {
            pattern: MaskedPattern::new(pattern, mask, false),
            mime,
        }
    }

    /// Masked pattern applied after leading whitespace
    pub const fn masked_after_whitespace(
        pattern: &'static [u8],
        mask: &'static [u8],
        mime: &'static str,
    ) -> Self {
        SignatureRule::Masked {
            pattern: MaskedPattern::new(pattern, mask, true),
            mime,
        }
    }

    /// Runtime counterpart of [`SignatureRule::masked`]
    pub fn try_masked(
        pattern: &'static [u8],
        mask: &'static [u8],
        mime: &'static str,
    ) -> Result<Self, SignatureError> {
        Ok(SignatureRule::Masked {
            pattern: MaskedPattern::try_new(pattern, mask, false)?,
            mime,
        })
    }

    /// Runtime counterpart of [`SignatureRule::masked_after_whitespace`]
    pub fn try_masked_after_whitespace(
        pattern: &'static [u8],
        mask: &'static [u8],
        mime: &'static str,
    ) -> Result<Self, SignatureError> {
        Ok(SignatureRule::Masked {
            pattern: MaskedPattern::try_new(pattern, mask, true)?,
            mime,
        })
    }

    pub const fn html(tag: &'static [u8]) -> Self {
        SignatureRule::Html { tag }
    }

    /// MIME type this rule yields on a match
    pub fn mime(&self) -> &'static str {
        match self {
            SignatureRule::Exact { mime, .. } | SignatureRule::Masked { mime, .. } => *mime,
            SignatureRule::Html { .. } => HTML_MIME,
            SignatureRule::Mp4 => MP4_MIME,
            SignatureRule::Text => TEXT_MIME,
        }
    }

    /// Test `data` (already truncated) against this rule.
    ///
    /// `first_non_ws` is the index of the first non-whitespace byte, or
    /// `data.len()` when there is none. Larger values are clamped to
    /// `data.len()`.
    pub fn matches(&self, data: &[u8], first_non_ws: usize) -> bool {
        let first_non_ws = first_non_ws.min(data.len());
        match self {
            SignatureRule::Exact { signature, .. } => data.starts_with(signature),
            SignatureRule::Masked { pattern, .. } => pattern.matches(data, first_non_ws),
            SignatureRule::Html { tag } => match_html(tag, &data[first_non_ws..]),
            SignatureRule::Mp4 => match_mp4(data),
            SignatureRule::Text => match_text(&data[first_non_ws..]),
        }
    }
}

fn match_html(tag: &[u8], data: &[u8]) -> bool {
    if data.len() < tag.len() + 1 {
        return false;
    }
    let name_matches = tag.iter().zip(data).all(|(&t, &d)| {
        if t.is_ascii_uppercase() {
            d & 0xDF == t
        } else {
            d == t
        }
    });
    name_matches && is_tag_terminator(data[tag.len()])
}

fn match_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 {
        return false;
    }
    if &data[4..8] != b"ftyp" {
        return false;
    }
    // offset 12 holds the major brand version, not a brand
    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| &data[offset..offset + 3] == b"mp4")
}

fn match_text(data: &[u8]) -> bool {
    !data
        .iter()
        .any(|&b| matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F))
}

/// EBML header followed by a DocType string at offset 31
const fn ebml_doctype<const N: usize>(doctype: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out[0] = 0x1A;
    out[1] = 0x45;
    out[2] = 0xDF;
    out[3] = 0xA3;
    let mut i = 0;
    while i < doctype.len() {
        out[31 + i] = doctype[i];
        i += 1;
    }
    out
}

/// Mask with `0xFF` over the first four bytes and the last `tail` bytes
const fn head_tail_mask<const N: usize>(tail: usize) -> [u8; N] {
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        if i < 4 || i >= N - tail {
            out[i] = 0xFF;
        }
        i += 1;
    }
    out
}

/// `zeros` don't-care bytes followed by `marker`
const fn offset_marker<const N: usize>(zeros: usize, marker: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let mut i = 0;
    while i < marker.len() {
        out[zeros + i] = marker[i];
        i += 1;
    }
    out
}

const fn offset_marker_mask<const N: usize>(zeros: usize) -> [u8; N] {
    let mut out = [0u8; N];
    let mut i = zeros;
    while i < N {
        out[i] = 0xFF;
        i += 1;
    }
    out
}

static MATROSKA_PATTERN: [u8; 39] = ebml_doctype(b"matroska");
static MATROSKA_MASK: [u8; 39] = head_tail_mask(8);
static WEBM_PATTERN: [u8; 35] = ebml_doctype(b"webm");
static WEBM_MASK: [u8; 35] = head_tail_mask(4);
static EOT_PATTERN: [u8; 36] = offset_marker(34, b"LP");
static EOT_MASK: [u8; 36] = offset_marker_mask(34);
static ACE_PATTERN: [u8; 14] = offset_marker(7, b"**ACE**");
static ACE_MASK: [u8; 14] = offset_marker_mask(7);

/// The built-in sniffing table, in priority order
#[rustfmt::skip]
pub static SIGNATURES: &[SignatureRule] = &[
    SignatureRule::html(b"<!DOCTYPE HTML"),
    SignatureRule::html(b"<HTML"),
    SignatureRule::html(b"<HEAD"),
    SignatureRule::html(b"<SCRIPT"),
    SignatureRule::html(b"<IFRAME"),
    SignatureRule::html(b"<H1"),
    SignatureRule::html(b"<DIV"),
    SignatureRule::html(b"<FONT"),
    SignatureRule::html(b"<TABLE"),
    SignatureRule::html(b"<A"),
    SignatureRule::html(b"<STYLE"),
    SignatureRule::html(b"<TITLE"),
    SignatureRule::html(b"<B"),
    SignatureRule::html(b"<BODY"),
    SignatureRule::html(b"<BR"),
    SignatureRule::html(b"<P"),
    SignatureRule::html(b"<!--"),
    SignatureRule::masked_after_whitespace(b"<?xml", b"\xFF\xFF\xFF\xFF\xFF", "text/xml; charset=utf-8"),
    SignatureRule::exact(b"%PDF-", "application/pdf"),
    SignatureRule::exact(b"%!PS-Adobe-", "application/postscript"),
    // === Byte order marks ===
    SignatureRule::masked(b"\xFE\xFF\x00\x00", b"\xFF\xFF\x00\x00", "text/plain; charset=utf-16be"),
    SignatureRule::masked(b"\xFF\xFE\x00\x00", b"\xFF\xFF\x00\x00", "text/plain; charset=utf-16le"),
    SignatureRule::masked(b"\xEF\xBB\xBF\x00", b"\xFF\xFF\xFF\x00", "text/plain; charset=utf-8"),
    // === Images ===
    SignatureRule::exact(b"\x00\x00\x01\x00", "image/x-icon"),
    SignatureRule::exact(b"\x00\x00\x02\x00", "image/x-icon"),
    SignatureRule::exact(b"BM", "image/bmp"),
    SignatureRule::exact(b"GIF87a", "image/gif"),
    SignatureRule::exact(b"GIF89a", "image/gif"),
    SignatureRule::masked(
        b"RIFF\x00\x00\x00\x00WEBPVP",
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        "image/webp",
    ),
    SignatureRule::exact(b"\x89PNG\r\n\x1A\n", "image/png"),
    SignatureRule::exact(b"\xFF\xD8\xFF", "image/jpeg"),
    SignatureRule::exact(b"qoif", "image/qoi"),
    // === Audio / video (WHATWG order) ===
    SignatureRule::masked(
        b"FORM\x00\x00\x00\x00AIFF",
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        "audio/aiff",
    ),
    SignatureRule::masked(b"ID3", b"\xFF\xFF\xFF", "audio/mpeg"),
    SignatureRule::masked(b"OggS\x00", b"\xFF\xFF\xFF\xFF\xFF", "application/ogg"),
    SignatureRule::masked(b"MThd\x00\x00\x00\x06", b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF", "audio/midi"),
    SignatureRule::masked(
        b"RIFF\x00\x00\x00\x00AVI ",
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        "video/avi",
    ),
    SignatureRule::masked(
        b"RIFF\x00\x00\x00\x00WAVE",
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        "audio/wave",
    ),
    SignatureRule::exact(b"fLaC", "audio/flac"),
    SignatureRule::exact(b"qoaf", "audio/qoa"),
    SignatureRule::Mp4,
    SignatureRule::masked(&MATROSKA_PATTERN, &MATROSKA_MASK, "video/x-matroska"),
    SignatureRule::masked(&WEBM_PATTERN, &WEBM_MASK, "video/webm"),
    // === Fonts ===
    SignatureRule::masked(&EOT_PATTERN, &EOT_MASK, "application/vnd.ms-fontobject"),
    SignatureRule::exact(b"\x00\x01\x00\x00", "font/ttf"),
    SignatureRule::exact(b"OTTO", "font/otf"),
    SignatureRule::exact(b"ttcf", "font/collection"),
    SignatureRule::exact(b"wOFF", "font/woff"),
    SignatureRule::exact(b"wOF2", "font/woff2"),
    // === Archives ===
    SignatureRule::exact(b"\x1F\x8B\x08", "application/x-gzip"),
    SignatureRule::exact(b"PK\x03\x04", "application/zip"),
    // RAR magic per rarlab.com (the WHATWG table has it wrong)
    SignatureRule::exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    SignatureRule::exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    SignatureRule::exact(b"7z\xBC\xAF\x27\x1C", "application/x-7z-compressed"),
    SignatureRule::exact(b"\xFD7zXZ\x00", "application/x-xz"),
    SignatureRule::exact(b"\x25\xB5\x2F\xFD", "application/zstd"),
    SignatureRule::exact(b"\x28\xB5\x2F\xFD", "application/zstd"),
    SignatureRule::exact(b"ArC\x01", "application/x-freearc"),
    SignatureRule::exact(b"BZh", "application/x-bzip2"),
    SignatureRule::exact(b"BZ0", "application/x-bzip"),
    SignatureRule::exact(b"zPQ", "application/x-zpaq"),
    SignatureRule::exact(b"7kSt", "application/x-zpaq"),
    SignatureRule::exact(b"!<arch>", "application/x-archive"),
    SignatureRule::masked(&ACE_PATTERN, &ACE_MASK, "application/x-ace-compressed"),
    // === Executables ===
    SignatureRule::exact(b"MZ", "application/vnd.microsoft.portable-executable"),
    SignatureRule::exact(b"\x7FELF", "application/x-elf"),
    SignatureRule::exact(b"\x00asm", "application/wasm"),
    // === Misc ===
    SignatureRule::exact(b"SQLite format 3", "application/x-sqlite3"),
    SignatureRule::exact(b"VTF", "image/vnd.valve.source.texture"),
    SignatureRule::exact(b"VBSP", "model/vnd.valve.source.compiled-map"),
    SignatureRule::Text,
];
