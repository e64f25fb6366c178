//! Pure-Rust FastLZ level 1 codec
//!
//! The compressor produces exactly the same bytes as the reference level 1
//! encoder, and the decompressor accepts any level 1 stream. The format does
//! not record the decompressed size, so it has to be stored elsewhere and
//! handed to the decompressor.
//!
//! ```
//! let data = b"hello hello hello hello hello hello";
//! let packed = fastlz_l1::compress(data);
//! let unpacked = fastlz_l1::decompress(&packed, data.len()).unwrap();
//! assert_eq!(&unpacked[..], &data[..]);
//! ```

#![no_std]

mod compress;
mod decompress;
mod util;

pub use compress::{CompressError, CompressState};
#[cfg(feature = "alloc")]
pub use decompress::decompress_to_vec;
pub use decompress::{decompress_to_buf, DecompressError};

#[cfg(feature = "alloc")]
extern crate alloc;

/// Longest literal run a single opcode can carry
pub const MAX_COPY: usize = 32;
/// Longest match a single opcode can carry
pub const MAX_LEN: usize = 256 + 8;
/// Furthest back a match can reach
pub const MAX_DISTANCE: usize = 8192;

/// Output buffer size that is always enough to compress `input_len` bytes
pub const fn max_compressed_size(input_len: usize) -> usize {
    // 1.4 * (len + 50), rounded up
    ((input_len + 50) * 7 + 4) / 5
}

#[cfg(feature = "alloc")]
/// Compress the input with a fresh [CompressState]
pub fn compress(inp: &[u8]) -> alloc::vec::Vec<u8> {
    CompressState::new().compress_to_vec(inp)
}

#[cfg(feature = "alloc")]
/// Same as [decompress_to_vec]
pub fn decompress(inp: &[u8], max_out: usize) -> Result<alloc::vec::Vec<u8>, DecompressError> {
    decompress_to_vec(inp, max_out)
}
