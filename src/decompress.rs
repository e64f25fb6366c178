use core::fmt::{self};

use crate::util::*;

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Decompression errors
///
/// All of these mean the compressed stream is corrupt
/// (or that it was decoded with a smaller size limit than it was made from).
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecompressError {
    /// An opcode or literal run continues past the end of the input
    InputTruncated,
    /// A backreference points before the start of the output
    InvalidBackreference,
    /// The output would exceed the size limit
    OutputTooSmall,
}

impl fmt::Display for DecompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompressError::InputTruncated => write!(f, "input was truncated"),
            DecompressError::InvalidBackreference => write!(f, "invalid backreference"),
            DecompressError::OutputTooSmall => write!(f, "output buffer was insufficient"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecompressError {}

// Both outputs check everything before writing,
// so a rejected opcode never leaves part of itself behind.

impl<'a> OutputSink<DecompressError> for BufOutput<'a> {
    fn put_lits(&mut self, lits: &[u8]) -> Result<(), DecompressError> {
        if lits.len() > self.remaining() {
            return Err(DecompressError::OutputTooSmall);
        }

        self.buf[self.pos..self.pos + lits.len()].copy_from_slice(lits);
        self.pos += lits.len();
        Ok(())
    }

    fn put_backref(&mut self, disp: usize, len: usize) -> Result<(), DecompressError> {
        if len > self.remaining() {
            return Err(DecompressError::OutputTooSmall);
        }
        if disp + 1 > self.pos {
            return Err(DecompressError::InvalidBackreference);
        }

        let src = self.pos - disp - 1;
        if disp == 0 {
            let b = self.buf[src];
            self.buf[self.pos..self.pos + len].fill(b);
        } else {
            // must go forwards one byte at a time, the source may overlap what's being written
            for i in 0..len {
                self.buf[self.pos + i] = self.buf[src + i];
            }
        }
        self.pos += len;

        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl OutputSink<DecompressError> for VecOutput {
    fn put_lits(&mut self, lits: &[u8]) -> Result<(), DecompressError> {
        if lits.len() > self.remaining() {
            return Err(DecompressError::OutputTooSmall);
        }

        self.vec.extend_from_slice(lits);
        Ok(())
    }

    fn put_backref(&mut self, disp: usize, len: usize) -> Result<(), DecompressError> {
        if len > self.remaining() {
            return Err(DecompressError::OutputTooSmall);
        }
        let pos = self.vec.len();
        if disp + 1 > pos {
            return Err(DecompressError::InvalidBackreference);
        }

        let src = pos - disp - 1;
        if disp == 0 {
            let b = self.vec[src];
            self.vec.resize(pos + len, b);
        } else {
            self.vec.resize(pos + len, 0);
            for i in 0..len {
                self.vec[pos + i] = self.vec[src + i];
            }
        }

        Ok(())
    }
}

trait InputHelper<'a> {
    fn next_byte(&mut self) -> Result<u8, DecompressError>;
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecompressError>;
}
impl<'a> InputHelper<'a> for &'a [u8] {
    fn next_byte(&mut self) -> Result<u8, DecompressError> {
        let inp: &'a [u8] = *self;
        let (&b, rest) = inp.split_first().ok_or(DecompressError::InputTruncated)?;
        *self = rest;
        Ok(b)
    }
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecompressError> {
        let inp: &'a [u8] = *self;
        if inp.len() < n {
            return Err(DecompressError::InputTruncated);
        }
        let (ret, rest) = inp.split_at(n);
        *self = rest;
        Ok(ret)
    }
}

fn decompress_impl(
    mut inp: &[u8],
    outp: &mut (impl OutputSink<DecompressError> + OutputLimit),
) -> Result<(), DecompressError> {
    if inp.is_empty() {
        return Ok(());
    }

    // the first opcode is always a literal run, whatever its top 3 bits say
    let mut ctrl = inp.next_byte()? & 0b000_11111;

    loop {
        let op = ctrl >> 5;
        if op == 0 {
            // output room is checked before input length
            let len = ctrl as usize + 1;
            if len > outp.remaining() {
                return Err(DecompressError::OutputTooSmall);
            }
            let lits = inp.take(len)?;
            outp.put_lits(lits)?;
        } else {
            let mut len = op as usize + 2;
            if op == 7 {
                len += inp.next_byte()? as usize;
            }
            let disp = (((ctrl & 0b000_11111) as usize) << 8) | inp.next_byte()? as usize;
            outp.put_backref(disp, len)?;
        }

        if inp.is_empty() {
            return Ok(());
        }
        ctrl = inp.next_byte()?;
    }
}

/// Decompress the input into a preallocated buffer
///
/// The length of `outp` is the most that will be decompressed.
/// Returns the decompressed size on success, or an error otherwise
pub fn decompress_to_buf(inp: &[u8], outp: &mut [u8]) -> Result<usize, DecompressError> {
    let mut outp: BufOutput = outp.into();
    decompress_impl(inp, &mut outp)?;
    Ok(outp.pos)
}

#[cfg(feature = "alloc")]
/// Decompress the input into a [Vec](alloc::vec::Vec)
///
/// The format doesn't record the decompressed size, so the caller has to
/// supply it as `max_out`. Streams that decode to more than that are rejected.
/// `max_out` is only a limit, the output isn't preallocated past what `inp` can expand to.
pub fn decompress_to_vec(
    inp: &[u8],
    max_out: usize,
) -> Result<alloc::vec::Vec<u8>, DecompressError> {
    // a 3 byte opcode expands to at most MAX_LEN bytes
    let mut ret = VecOutput::with_limit(max_out, inp.len().saturating_mul(crate::MAX_LEN));
    decompress_impl(inp, &mut ret)?;
    Ok(ret.vec)
}
