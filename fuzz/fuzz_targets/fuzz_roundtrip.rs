//! Fuzzing target for compress/decompress round trips
//!
//! ```bash
//! cargo fuzz run fuzz_roundtrip
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let packed = fastlz_l1::compress(data);
    assert!(packed.len() <= fastlz_l1::max_compressed_size(data.len()));

    let unpacked = fastlz_l1::decompress(&packed, data.len()).unwrap();
    assert_eq!(unpacked, data);
});
