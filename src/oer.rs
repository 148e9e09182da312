//! # OER Byte Cursor
//!
//! Low-level reader/writer for the octet encoding rules the wire format is
//! built from: fixed-width big-endian integers and length-prefixed variable
//! octet strings.
//!
//! ## Components
//! - **Reader**: borrowing cursor over a byte slice with bookmark/restore
//!   checkpointing (used for embedded sub-packet capture)
//! - **Writer**: growable buffer built on [`bytes::BytesMut`]
//!
//! ## Length Prefixes
//! A variable octet string is prefixed by its length. Lengths below 128 are
//! a single byte. Longer strings set the high bit of the first byte, whose
//! low 7 bits then give the number of big-endian length bytes that follow.

use crate::error::{CodecError, Result};
use bytes::{BufMut, BytesMut};

/// Borrowing byte cursor over an immutable slice.
///
/// All reads advance the cursor; a failed read leaves the cursor position
/// unspecified and the whole decode is abandoned.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position, usable as a bookmark for [`restore`](Self::restore).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind (or advance) the cursor to a previously obtained position.
    pub fn restore(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The raw bytes between a bookmark and the current cursor.
    pub fn slice_since(&self, mark: usize) -> &'a [u8] {
        &self.buf[mark..self.pos]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated(n - self.remaining()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read the next byte without advancing the cursor.
    pub fn peek_u8(&self) -> Result<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(CodecError::Truncated(1))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a 64-bit value stored as two 32-bit big-endian words.
    ///
    /// The legacy wire form of an amount. Byte-identical to [`read_u64`](Self::read_u64);
    /// the combination `hi * 2^32 + lo` is kept explicit for the legacy
    /// payload path.
    pub fn read_u64_pair(&mut self) -> Result<u64> {
        let hi = self.read_u32()?;
        let lo = self.read_u32()?;
        Ok(u64::from(hi) << 32 | u64::from(lo))
    }

    /// Read exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read a length-prefixed variable octet string.
    pub fn read_var_octet_string(&mut self) -> Result<&'a [u8]> {
        let first = self.read_u8()?;
        let len = if first & 0x80 == 0 {
            u64::from(first)
        } else {
            let len_of_len = usize::from(first & 0x7f);
            if len_of_len == 0 || len_of_len > 8 {
                return Err(CodecError::Malformed(format!(
                    "invalid length-of-length: {len_of_len}"
                )));
            }
            let mut len = 0u64;
            for &byte in self.take(len_of_len)? {
                len = len << 8 | u64::from(byte);
            }
            len
        };
        let len = usize::try_from(len)
            .map_err(|_| CodecError::Malformed(format!("octet string length {len} too large")))?;
        self.take(len)
    }

    /// Skip over a variable octet string without inspecting its contents.
    pub fn skip_var_octet_string(&mut self) -> Result<()> {
        self.read_var_octet_string().map(|_| ())
    }
}

/// Growable byte buffer with big-endian primitive writers.
#[derive(Debug, Default)]
pub struct Writer {
    buf: BytesMut,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    /// Write a 64-bit value as two 32-bit big-endian words.
    ///
    /// Byte-identical to [`write_u64`](Self::write_u64); kept explicit for
    /// the legacy payload path.
    pub fn write_u64_pair(&mut self, hi: u32, lo: u32) {
        self.buf.put_u32(hi);
        self.buf.put_u32(lo);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Write a length-prefixed variable octet string.
    pub fn write_var_octet_string(&mut self, data: &[u8]) {
        self.write_var_octet_string_prefix(data.len());
        self.buf.put_slice(data);
    }

    /// Write only the length prefix of a variable octet string. The caller
    /// must append exactly `len` bytes afterwards.
    pub fn write_var_octet_string_prefix(&mut self, len: usize) {
        if len < 128 {
            self.buf.put_u8(len as u8);
        } else {
            let bits = usize::BITS - len.leading_zeros();
            let len_of_len = ((bits + 7) / 8) as usize;
            self.buf.put_u8(0x80 | len_of_len as u8);
            for shift in (0..len_of_len).rev() {
                self.buf.put_u8((len >> (8 * shift)) as u8);
            }
        }
    }
}
