//! Fuzzing target for the decompressor
//!
//! The first two bytes pick the output size limit, the rest is the stream.
//!
//! ```bash
//! cargo fuzz run fuzz_decompress
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let max_out = u16::from_le_bytes([data[0], data[1]]) as usize;
    let stream = &data[2..];

    let mut buf = vec![0u8; max_out];
    let from_buf = fastlz_l1::decompress_to_buf(stream, &mut buf);
    let from_vec = fastlz_l1::decompress_to_vec(stream, max_out);

    match (from_buf, from_vec) {
        (Ok(n), Ok(out)) => assert_eq!(buf[..n], out[..]),
        (Err(e1), Err(e2)) => assert_eq!(e1, e2),
        (r1, r2) => panic!("buf gave {:?}, vec gave {:?}", r1, r2),
    }
});
