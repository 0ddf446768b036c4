//! Property tests for sniffing and bit packing

use proptest::prelude::*;

use sniffhash::sniff::{FALLBACK_MIME, HTML_MIME, SNIFF_LEN};
use sniffhash::{classify, BitPacker, SIGNATURES};

proptest! {
    #[test]
    fn png_signature_wins_regardless_of_payload(tail in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
        data.extend(tail);
        prop_assert_eq!(classify(&data), "image/png");
    }

    #[test]
    fn gif89a_signature_wins(tail in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut data = b"GIF89a".to_vec();
        data.extend(tail);
        prop_assert_eq!(classify(&data), "image/gif");
    }

    #[test]
    fn bytes_past_the_window_are_ignored(
        head in proptest::collection::vec(any::<u8>(), SNIFF_LEN..SNIFF_LEN + 1),
        tail in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut data = head.clone();
        data.extend(tail);
        prop_assert_eq!(classify(&data), classify(&head));
    }

    #[test]
    fn result_is_a_known_mime(data in proptest::collection::vec(any::<u8>(), 0..600)) {
        let mime = classify(&data);
        prop_assert!(mime == FALLBACK_MIME || SIGNATURES.iter().any(|rule| rule.mime() == mime));
    }

    #[test]
    fn html_tags_match_in_any_case(upper in proptest::collection::vec(any::<bool>(), 4), close in prop_oneof![Just(b' '), Just(b'>')]) {
        let mut data = vec![b'<'];
        for (c, up) in b"html".iter().zip(upper) {
            data.push(if up { c.to_ascii_uppercase() } else { *c });
        }
        data.push(close);
        prop_assert_eq!(classify(&data), HTML_MIME);
    }

    #[test]
    fn packer_sets_exactly_the_pushed_bits(bits in proptest::collection::vec(any::<bool>(), 1..200)) {
        let mut packer = BitPacker::for_bits(bits.len()).unwrap();
        for &bit in &bits {
            packer.append_bit(bit).unwrap();
        }
        let bytes = packer.finish();
        prop_assert_eq!(bytes.len(), bits.len().div_ceil(8));

        let ones: u32 = bytes.iter().map(|b| b.count_ones()).sum();
        prop_assert_eq!(ones as usize, bits.iter().filter(|&&b| b).count());
        for (i, &bit) in bits.iter().enumerate() {
            let set = bytes[i / 8] & (0x80 >> (i % 8)) != 0;
            prop_assert_eq!(set, bit);
        }
    }
}
