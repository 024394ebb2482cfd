//! Sequential reader for a flat buffer.

use std::borrow::Cow;

use crate::compact_size::{
    COMPACT_U16_PREFIX, COMPACT_U32_PREFIX, COMPACT_U64_PREFIX, MAX_EXACT_INT, width_from_prefix,
};
use crate::errors::CodecError;

/// Byte order for fixed-width integer reads.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endian {
    /// Least significant byte first, the ledger's usual order.
    Little,

    /// Most significant byte first.
    Big,
}

/// Cursor over a byte buffer.
///
/// Every read either advances the position by exactly the number of bytes it
/// consumed or fails and leaves the position where it was.  The buffer is
/// borrowed unless it had to be produced (from hex, or by
/// [`Self::reverse_in_place`]).
#[derive(Clone, Debug)]
pub struct ByteCursor<'b> {
    buf: Cow<'b, [u8]>,
    at: usize,
}

impl<'b> ByteCursor<'b> {
    /// Constructs a new instance by wrapping a buffer and starting at the
    /// beginning.
    pub fn new(buf: &'b [u8]) -> Self {
        Self {
            buf: Cow::Borrowed(buf),
            at: 0,
        }
    }

    /// Returns the length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Returns the total number of remaining bytes that can be read.
    pub fn remaining(&self) -> usize {
        self.len() - self.at
    }

    /// Returns if every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.at >= self.len()
    }

    /// Consumes `n` bytes, returning them.
    fn take(&mut self, n: usize) -> Result<&[u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::Underrun {
                needed: n,
                remaining: self.remaining(),
            });
        }

        let start = self.at;
        self.at += n;
        Ok(&self.buf[start..self.at])
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], CodecError> {
        self.take(n)
    }

    /// Reads a fixed size array.
    pub fn read_arr<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut arr = [0; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    /// Reads an unsigned integer `width` bytes wide (1, 2, 4 or 8).
    pub fn read_uint(&mut self, width: usize, endian: Endian) -> Result<u64, CodecError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(CodecError::UnsupportedWidth(width));
        }

        let bytes = self.take(width)?;
        let fold = |acc: u64, b: &u8| (acc << 8) | *b as u64;
        Ok(match endian {
            Endian::Big => bytes.iter().fold(0, fold),
            Endian::Little => bytes.iter().rev().fold(0, fold),
        })
    }

    /// Reads a two's complement signed integer `width` bytes wide.
    pub fn read_int(&mut self, width: usize, endian: Endian) -> Result<i64, CodecError> {
        let raw = self.read_uint(width, endian)?;
        let shift = 64 - width as u32 * 8;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Reads a full 64-bit value.
    ///
    /// `u64` holds every 64-bit ledger value exactly, so there is no lossy
    /// path to guard against here.
    pub fn read_u64(&mut self, endian: Endian) -> Result<u64, CodecError> {
        match endian {
            Endian::Little => self.read_u64_le(),
            Endian::Big => self.read_u64_be(),
        }
    }

    /// Reads a compact-size integer over its full range.
    pub fn read_compact_size(&mut self) -> Result<u64, CodecError> {
        let start = self.at;
        let res = self.read_compact_size_unchecked();
        if res.is_err() {
            self.at = start;
        }
        res
    }

    fn read_compact_size_unchecked(&mut self) -> Result<u64, CodecError> {
        let first = self.read_u8()?;
        Ok(match first {
            COMPACT_U16_PREFIX => self.read_u16_le()? as u64,
            COMPACT_U32_PREFIX => self.read_u32_le()? as u64,
            COMPACT_U64_PREFIX => self.read_u64_le()?,
            n => n as u64,
        })
    }

    /// Reads a compact-size integer, refusing values above [`MAX_EXACT_INT`].
    pub fn read_compact_length(&mut self) -> Result<u64, CodecError> {
        let start = self.at;
        let v = self.read_compact_size()?;
        if v > MAX_EXACT_INT {
            self.at = start;
            return Err(CodecError::PrecisionLoss(v));
        }
        Ok(v)
    }

    /// Returns the raw bytes of the next compact-size integer, prefix
    /// included, without interpreting them.
    pub fn read_compact_size_raw(&mut self) -> Result<&[u8], CodecError> {
        let first = *self.buf.get(self.at).ok_or(CodecError::Underrun {
            needed: 1,
            remaining: 0,
        })?;
        self.take(width_from_prefix(first))
    }

    /// Reads a compact length and then exactly that many bytes.
    pub fn read_length_prefixed(&mut self) -> Result<&[u8], CodecError> {
        let start = self.at;
        let len = self.read_compact_length()?;

        let available = self.remaining();
        match usize::try_from(len) {
            Ok(n) if n <= available => self.take(n),
            _ => {
                self.at = start;
                Err(CodecError::ShortRead {
                    expected: len,
                    available,
                })
            }
        }
    }

    /// Reads everything left and moves to the end.
    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.at;
        self.at = self.len();
        &self.buf[start..]
    }

    /// Reads `len` bytes (everything left if `None`) and returns them in
    /// reverse order.  The buffer itself is untouched.
    pub fn read_reversed(&mut self, len: Option<usize>) -> Result<Vec<u8>, CodecError> {
        let len = len.unwrap_or_else(|| self.remaining());
        let mut out = self.take(len)?.to_vec();
        out.reverse();
        Ok(out)
    }

    /// Replaces the buffer with its byte-reversed copy.  The position is kept.
    pub fn reverse_in_place(&mut self) {
        let mut rev = self.buf.to_vec();
        rev.reverse();
        self.buf = Cow::Owned(rev);
    }
}

impl ByteCursor<'static> {
    /// Constructs an instance owning the bytes decoded from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        Ok(Self {
            buf: Cow::Owned(hex::decode(s)?),
            at: 0,
        })
    }
}

impl_int_readers! {
    read_u8 => u8::from_le_bytes,
    read_u16_le => u16::from_le_bytes,
    read_u16_be => u16::from_be_bytes,
    read_u32_le => u32::from_le_bytes,
    read_u32_be => u32::from_be_bytes,
    read_i32_le => i32::from_le_bytes,
    read_u64_le => u64::from_le_bytes,
    read_u64_be => u64::from_be_bytes,
}
