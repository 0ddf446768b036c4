//! Integration tests for signature sniffing
//!
//! Exercises the public classification API against files on disk and
//! realistic container headers.

use std::io::Cursor;

use tempfile::tempdir;

use sniffhash::sniff::{FALLBACK_MIME, HTML_MIME, MP4_MIME, SNIFF_LEN, TEXT_MIME};
use sniffhash::{classify, classify_reader, SignatureRule, Sniffer, SIGNATURES};

/// An ISO BMFF `ftyp` box with a major brand and compatible brands
fn ftyp_box(major: &[u8; 4], compatible: &[&[u8; 4]]) -> Vec<u8> {
    let size = 16 + 4 * compatible.len();
    let mut data = Vec::with_capacity(size);
    data.extend_from_slice(&(size as u32).to_be_bytes());
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(major);
    data.extend_from_slice(&[0, 0, 0, 1]);
    for brand in compatible {
        data.extend_from_slice(*brand);
    }
    data
}

#[test]
fn test_files_on_disk() {
    let dir = tempdir().unwrap();
    let cases: &[(&str, &[u8], &str)] = &[
        ("index.html", b"\n\n<html><body>hi</body></html>", HTML_MIME),
        ("doc.pdf", b"%PDF-1.4\n%\xE2\xE3\xCF\xD3", "application/pdf"),
        ("notes.md", b"# Title\n\nSome text.\n", TEXT_MIME),
        ("blob.bin", b"\x00\x00\x00\x00\xDE\xAD", FALLBACK_MIME),
        ("archive.7z", b"7z\xBC\xAF\x27\x1C\x00\x04", "application/x-7z-compressed"),
        ("pic.bmp", b"BM\x36\x00\x0C\x00", "image/bmp"),
    ];

    for (name, content, expected) in cases {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        let file = std::fs::File::open(&path).unwrap();
        assert_eq!(classify_reader(file).unwrap(), *expected, "{}", name);
    }
}

#[test]
fn test_mp4_brands() {
    assert_eq!(classify(&ftyp_box(b"isom", &[b"isom", b"mp41"])), MP4_MIME);
    assert_eq!(classify(&ftyp_box(b"qt  ", &[b"qt  ", b"mp42"])), MP4_MIME);

    // brand only at offset 12, which is the minor version slot
    let mut data = ftyp_box(b"qt  ", &[b"qt  "]);
    data[12..16].copy_from_slice(b"mp4x");
    assert_eq!(classify(&data), FALLBACK_MIME);
}

#[test]
fn test_mp4_box_size_must_fit() {
    let mut data = ftyp_box(b"mp42", &[b"mp42"]);
    // claim a box larger than the data
    data[3] = 200;
    assert_ne!(classify(&data), MP4_MIME);

    let mut data = ftyp_box(b"mp42", &[b"mp42"]);
    // not a multiple of four
    data[3] = 18;
    assert_ne!(classify(&data), MP4_MIME);
}

#[test]
fn test_table_order_is_first_match() {
    // "\xEF\xBB\xBF" BOM is also valid text, the BOM rule comes first
    assert_eq!(classify(b"\xEF\xBB\xBFplain"), "text/plain; charset=utf-8");
    // HTML with leading whitespace beats the text rule
    assert_eq!(classify(b"\t <!-- x -->"), HTML_MIME);
    // the text rule is last in the table
    assert!(matches!(SIGNATURES.last(), Some(SignatureRule::Text)));
}

#[test]
fn test_reader_matches_slice_api() {
    let mut data = b"GIF89a".to_vec();
    data.extend(std::iter::repeat(0xAB).take(SNIFF_LEN * 4));
    let from_reader = classify_reader(Cursor::new(&data)).unwrap();
    assert_eq!(from_reader, classify(&data));
    assert_eq!(from_reader, "image/gif");
}

#[test]
fn test_custom_sniffer() {
    static RULES: &[SignatureRule] = &[
        SignatureRule::exact(b"SNFH", "application/x-sniffhash"),
        SignatureRule::masked(b"AB", b"\xDF\xDF", "application/x-ab"),
    ];
    let sniffer = Sniffer::new(RULES);
    assert_eq!(sniffer.classify(b"SNFH\x01"), "application/x-sniffhash");
    assert_eq!(sniffer.classify(b"ab"), "application/x-ab");
    assert_eq!(sniffer.classify(b"AB"), "application/x-ab");
    assert_eq!(sniffer.classify(b"hello"), FALLBACK_MIME);
}
