#[cfg(feature = "alloc")]
extern crate alloc;

/// Internal abstraction for the two directions of the codec
///
/// The compressor implements this on a token writer (serializing into the
/// level 1 wire format), the decompressor implements it on the raw outputs
/// (reconstructing the original bytes).
pub trait OutputSink<ErrTy> {
    /// Add the given literal run to the output
    fn put_lits(&mut self, lits: &[u8]) -> Result<(), ErrTy>;
    /// Add a backreference to the output
    ///
    /// A `disp` of 0 means the current position minus 1.
    /// Increasing `disp` means further backwards
    ///
    /// Copy `len` bytes, which as usual for LZ77 may exceed `disp`.
    fn put_backref(&mut self, disp: usize, len: usize) -> Result<(), ErrTy>;
}

/// Output into a caller-provided slice
pub struct BufOutput<'a> {
    pub pos: usize,
    pub buf: &'a mut [u8],
}
impl<'a> From<&'a mut [u8]> for BufOutput<'a> {
    fn from(buf: &'a mut [u8]) -> Self {
        Self { pos: 0, buf }
    }
}

/// Outputs that can only take so many more bytes
pub trait OutputLimit {
    fn remaining(&self) -> usize;
}
impl<'a> OutputLimit for BufOutput<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Output into a growable [Vec](alloc::vec::Vec), optionally bounded
#[cfg(feature = "alloc")]
pub struct VecOutput {
    pub vec: alloc::vec::Vec<u8>,
    pub limit: usize,
}
#[cfg(feature = "alloc")]
impl From<alloc::vec::Vec<u8>> for VecOutput {
    fn from(vec: alloc::vec::Vec<u8>) -> Self {
        Self {
            vec,
            limit: usize::MAX,
        }
    }
}
#[cfg(feature = "alloc")]
impl VecOutput {
    /// `capacity_hint` is only preallocated as far as `limit` allows
    pub fn with_limit(limit: usize, capacity_hint: usize) -> Self {
        Self {
            vec: alloc::vec::Vec::with_capacity(usize::min(limit, capacity_hint)),
            limit,
        }
    }
}
#[cfg(feature = "alloc")]
impl OutputLimit for VecOutput {
    fn remaining(&self) -> usize {
        self.limit - self.vec.len()
    }
}
