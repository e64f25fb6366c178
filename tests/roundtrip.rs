//! Round trip and decoder safety properties

#![cfg(feature = "alloc")]

use fastlz_l1::*;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

const CORPUS: &[u8] = include_bytes!("data/domains.txt");

#[test]
fn test_empty() {
    assert_eq!(compress(b""), b"");
    assert_eq!(decompress(b"", 0), Ok(vec![]));
}

#[test]
fn test_short_inputs() {
    for inp in [&[0x42u8][..], &[1, 2][..], &[1, 2, 3][..], &[0, 0, 0][..]] {
        let out = compress(inp);
        assert_eq!(out.len(), inp.len() + 1);
        assert_eq!(out[0] as usize, inp.len() - 1);
        assert_eq!(&out[1..], inp);
        assert_eq!(decompress(&out, inp.len()).unwrap(), inp);
    }
}

#[test]
fn test_scenarios() {
    let inp = b"ABCDABCDABCDABCD";
    assert_eq!(decompress(&compress(inp), inp.len()).unwrap(), inp);

    let inp = [0x7a; 300];
    let out = compress(&inp);
    assert_eq!(decompress(&out, 300).unwrap(), inp);
    assert_eq!(decompress(&out, 299), Err(DecompressError::OutputTooSmall));

    assert!(decompress(&[0x20, 0x00, 0x00], 0).is_err());
    assert!(decompress(&[0x20, 0x00, 0x00], 3).is_err());
    assert!(decompress(&[0x20, 0x00, 0x00], 1 << 20).is_err());

    assert_eq!(
        decompress(&[0x1f, 1, 2, 3, 4, 5], 64),
        Err(DecompressError::InputTruncated)
    );
    assert_eq!(
        decompress(&[0x1f, 1, 2, 3, 4, 5], 4),
        Err(DecompressError::OutputTooSmall)
    );
}

#[test]
fn test_unbounded_limit() {
    assert_eq!(decompress(&[0x00, 0x41], usize::MAX), Ok(vec![0x41]));

    let inp = &CORPUS[..4096];
    assert_eq!(decompress(&compress(inp), usize::MAX).unwrap(), inp);
}

#[test]
fn test_random_prefixes() {
    let mut rng = StdRng::seed_from_u64(0x66_61_73_74_6c_7a);
    let mut state = CompressState::new();
    let mut buf = vec![0u8; max_compressed_size(65535)];

    for _ in 0..10_000 {
        let len = rng.gen_range(16..=65535);
        let inp = &CORPUS[..len];

        let out = state.compress_to_vec(inp);
        let n = state.compress_to_buf(inp, &mut buf).unwrap();
        assert_eq!(out, buf[..n], "buf/vec mismatch for length {}", len);

        let check = decompress(&out, len).unwrap();
        assert!(check == inp, "roundtrip mismatch for length {}", len);
    }
}

#[test]
fn test_larger_than_window() {
    // matches further than 8192 back can't be used
    let mut inp = CORPUS[..9000].to_vec();
    inp.extend_from_slice(&CORPUS[..9000]);
    let out = compress(&inp);
    assert_eq!(decompress(&out, inp.len()).unwrap(), inp);
}

fn low_entropy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![0u8, 0, 0, 1, 2, 0xff]), 0..8192)
}

proptest! {
    #[test]
    fn roundtrip_arbitrary(inp in prop::collection::vec(any::<u8>(), 0..4096)) {
        let out = compress(&inp);
        prop_assert!(out.len() <= max_compressed_size(inp.len()));
        prop_assert_eq!(decompress(&out, inp.len()).unwrap(), inp);
    }

    #[test]
    fn roundtrip_low_entropy(inp in low_entropy()) {
        let out = compress(&inp);
        prop_assert_eq!(decompress(&out, inp.len()).unwrap(), inp);
    }

    #[test]
    fn roundtrip_larger_limit(inp in low_entropy(), extra in 0usize..1024) {
        let out = compress(&inp);
        prop_assert_eq!(decompress(&out, inp.len() + extra).unwrap(), inp);
    }

    #[test]
    fn smaller_limit_rejected(inp in low_entropy().prop_filter("nonempty", |v| !v.is_empty())) {
        let out = compress(&inp);
        prop_assert_eq!(
            decompress(&out, inp.len() - 1),
            Err(DecompressError::OutputTooSmall)
        );
    }

    #[test]
    fn first_byte_top_bits_ignored(
        inp in prop::collection::vec(any::<u8>(), 1..2048),
        top in 0u8..8,
    ) {
        let mut out = compress(&inp);
        out[0] = (out[0] & 0x1f) | (top << 5);
        prop_assert_eq!(decompress(&out, inp.len()).unwrap(), inp);
    }

    #[test]
    fn decode_garbage_unbounded(inp in prop::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(out) = decompress_to_vec(&inp, usize::MAX) {
            prop_assert!(out.len() <= inp.len() * MAX_LEN);
        }
    }

    #[test]
    fn decode_garbage(
        inp in prop::collection::vec(any::<u8>(), 0..512),
        max_out in 0usize..4096,
    ) {
        let from_vec = decompress_to_vec(&inp, max_out);
        if let Ok(out) = &from_vec {
            prop_assert!(out.len() <= max_out);
        }

        let mut buf = vec![0u8; max_out];
        match (decompress_to_buf(&inp, &mut buf), from_vec) {
            (Ok(n), Ok(out)) => prop_assert_eq!(&buf[..n], &out[..]),
            (Err(e1), Err(e2)) => prop_assert_eq!(e1, e2),
            (r1, r2) => prop_assert!(false, "buf gave {:?}, vec gave {:?}", r1, r2),
        }
    }
}
