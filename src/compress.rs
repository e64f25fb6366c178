#[cfg(feature = "alloc")]
use core::convert::Infallible;
use core::fmt;
use core::mem;

use crate::util::*;
use crate::{MAX_COPY, MAX_DISTANCE, MAX_LEN};

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

const HTAB_LOG2: usize = 13;
const HTAB_SZ: usize = 1 << HTAB_LOG2;
const HTAB_MASK: usize = HTAB_SZ - 1;

/// Compression errors
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompressError {
    /// The output buffer was too small to hold all the output.
    ///
    /// A buffer of [max_compressed_size](crate::max_compressed_size) bytes never fails.
    OutputTooSmall,
}
impl fmt::Display for CompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressError::OutputTooSmall => write!(f, "output buffer was insufficient"),
        }
    }
}
#[cfg(feature = "std")]
impl std::error::Error for CompressError {}

trait OutputHelper {
    type Error;
    fn putc(&mut self, c: u8) -> Result<(), Self::Error>;
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}
impl<'a> OutputHelper for BufOutput<'a> {
    type Error = CompressError;

    fn putc(&mut self, c: u8) -> Result<(), CompressError> {
        if self.remaining() >= 1 {
            self.buf[self.pos] = c;
            self.pos += 1;
            Ok(())
        } else {
            Err(CompressError::OutputTooSmall)
        }
    }
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), CompressError> {
        if self.remaining() < buf.len() {
            return Err(CompressError::OutputTooSmall);
        }

        self.buf[self.pos..self.pos + buf.len()].copy_from_slice(buf);
        self.pos += buf.len();
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl OutputHelper for VecOutput {
    type Error = Infallible;

    fn putc(&mut self, c: u8) -> Result<(), Infallible> {
        self.vec.push(c);
        Ok(())
    }
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), Infallible> {
        self.vec.extend_from_slice(buf);
        Ok(())
    }
}

/// Serializes literal runs and backreferences as level 1 tokens
struct L1Output<O>(O);

impl<O: OutputHelper> OutputSink<O::Error> for L1Output<O> {
    fn put_lits(&mut self, mut lits: &[u8]) -> Result<(), O::Error> {
        while lits.len() > MAX_COPY {
            self.0.putc((MAX_COPY - 1) as u8)?;
            self.0.put_buf(&lits[..MAX_COPY])?;
            lits = &lits[MAX_COPY..];
        }

        debug_assert!(lits.len() >= 1);
        debug_assert!(lits.len() <= MAX_COPY);

        // 1 byte opcode, len bytes literals
        self.0.putc((lits.len() - 1) as u8)?;
        self.0.put_buf(lits)?;

        Ok(())
    }

    fn put_backref(&mut self, disp: usize, mut len: usize) -> Result<(), O::Error> {
        debug_assert!(disp < MAX_DISTANCE);
        debug_assert!(len >= 3);

        // too long for a single backref, so emit max-ish chunks with the same displacement.
        // the chunks are 262 rather than 264 bytes, which always leaves >= 3 for the tail
        while len > MAX_LEN {
            let b0 = 0b111_00000 | ((disp >> 8) as u8);
            let b1 = (MAX_LEN - 2 - 9) as u8;
            let b2 = disp as u8;
            self.0.putc(b0)?;
            self.0.putc(b1)?;
            self.0.putc(b2)?;
            len -= MAX_LEN - 2;
        }

        if len <= 8 {
            // 2 bytes opcode
            let b0 = (((len - 2) << 5) | (disp >> 8)) as u8;
            let b1 = disp as u8;
            self.0.putc(b0)?;
            self.0.putc(b1)?;
        } else {
            // 3 bytes opcode
            let b0 = 0b111_00000 | ((disp >> 8) as u8);
            let b1 = (len - 9) as u8;
            let b2 = disp as u8;
            self.0.putc(b0)?;
            self.0.putc(b1)?;
            self.0.putc(b2)?;
        }

        Ok(())
    }
}

/// Hash of the 3 bytes at `pos`, as a 13-bit hash table index
///
/// The exact formula determines which matches get found,
/// so it must not change if output is to stay identical to the reference encoder.
pub(crate) fn hash3(inp: &[u8], pos: usize) -> usize {
    let v = u16::from_le_bytes([inp[pos], inp[pos + 1]]);
    let w = u16::from_le_bytes([inp[pos + 1], inp[pos + 2]]);
    let v = v ^ w ^ (v >> (16 - HTAB_LOG2));
    v as usize & HTAB_MASK
}

/// Holds state for performing compression operations
///
/// This only exists so that the hash table can be reused across many calls.
/// It is cleared at the start of every call, so nothing carries over between inputs.
pub struct CompressState {
    htab: [u32; HTAB_SZ],
}
impl Default for CompressState {
    fn default() -> Self {
        Self::new()
    }
}
impl CompressState {
    /// Allocate a new compression state
    pub fn new() -> Self {
        Self { htab: [0; HTAB_SZ] }
    }

    fn compress_impl<O: OutputHelper>(
        &mut self,
        inp: &[u8],
        outp: &mut L1Output<O>,
    ) -> Result<(), O::Error> {
        if inp.is_empty() {
            return Ok(());
        }
        if inp.len() < 4 {
            return outp.put_lits(inp);
        }

        // a zeroed table looks like "position 0 was hashed everywhere",
        // which the distance and content checks below deal with
        self.htab.fill(0);

        let ip_bound = inp.len() - 2;
        let ip_limit = inp.len().saturating_sub(12);

        // the first two bytes are always literals
        let mut lits_start = 0;
        let mut ip = 2;

        while ip < ip_limit {
            let anchor = ip;
            let hash = hash3(inp, anchor);
            let ref_pos = mem::replace(&mut self.htab[hash], anchor as u32) as usize;
            let dist = anchor.wrapping_sub(ref_pos);

            if dist == 0
                || dist >= MAX_DISTANCE
                || inp[ref_pos..ref_pos + 3] != inp[anchor..anchor + 3]
            {
                // no match
                ip += 1;
                continue;
            }

            // we have a match of at least three bytes
            let disp = dist - 1;
            let mut ref_ = ref_pos + 3;
            ip = anchor + 3;

            if disp == 0 {
                // run of a single byte, compared one position behind
                let x = inp[ip - 1];
                while ip < ip_bound && inp[ref_] == x {
                    ip += 1;
                    ref_ += 1;
                }
            } else {
                while ip < ip_bound && inp[ref_] == inp[ip] {
                    ip += 1;
                    ref_ += 1;
                }
                if ip < ip_bound {
                    ip += 1;
                }
            }

            // either way, the match stops at ip - 1.
            // at the bound that leaves a matching byte behind for the tail literals
            let match_end = ip - 1;
            let len = match_end - anchor;

            // any accumulated lits?
            let lits = &inp[lits_start..anchor];
            if !lits.is_empty() {
                outp.put_lits(lits)?;
            }

            // now we can finally put in the match
            outp.put_backref(disp, len)?;

            // update hashes at the boundary
            for pos in [match_end - 2, match_end - 1] {
                self.htab[hash3(inp, pos)] = pos as u32;
            }

            ip = match_end;
            lits_start = match_end;
        }

        // if there's anything leftover, output it
        let lits = &inp[lits_start..];
        if !lits.is_empty() {
            outp.put_lits(lits)?;
        }

        Ok(())
    }

    /// Compress the input into a preallocated buffer
    ///
    /// Returns the compressed size on success, or an error otherwise
    pub fn compress_to_buf(&mut self, inp: &[u8], outp: &mut [u8]) -> Result<usize, CompressError> {
        let mut outp: L1Output<BufOutput> = L1Output(outp.into());
        self.compress_impl(inp, &mut outp)?;
        Ok(outp.0.pos)
    }

    #[cfg(feature = "alloc")]
    /// Compress the input into a [Vec](alloc::vec::Vec)
    pub fn compress_to_vec(&mut self, inp: &[u8]) -> alloc::vec::Vec<u8> {
        let ret = alloc::vec::Vec::with_capacity(crate::max_compressed_size(inp.len()));
        let mut ret: L1Output<VecOutput> = L1Output(ret.into());
        match self.compress_impl(inp, &mut ret) {
            Ok(()) => ret.0.vec,
            Err(e) => match e {},
        }
    }
}
