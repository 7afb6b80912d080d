//! Byte-level reading and writing.
//!
//! Implements bounds-checked slice reads and the LEB128 size prefix used by
//! strings and containers.

use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_SIZE, MAX_SIZE_BYTES};

// =============================================================================
// DECODING
// =============================================================================

/// Cursor over an encoded payload.
///
/// Every read checks the remaining length first, so a failed read leaves the
/// cursor where it was.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining_len(&self) -> usize {
        self.input.len() - self.offset
    }

    /// True once every byte was read.
    pub fn is_empty(&self) -> bool {
        self.remaining_len() == 0
    }

    #[inline]
    fn require_remaining(&self, n: usize) -> Result<(), DecodeError> {
        let remaining = self.remaining_len();
        if remaining < n {
            Err(DecodeError::BufferUnderflow {
                required: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Borrows the next `n` bytes of the input.
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.require_remaining(n)?;
        let (taken, _) = self.input[self.offset..].split_at(n);
        self.offset += n;
        Ok(taken)
    }

    /// Reads a fixed-width field, e.g. a little-endian integer.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Reads an unsigned LEB128 size of at most [`MAX_SIZE_BYTES`] bytes.
    #[inline]
    pub fn read_size(&mut self) -> Result<usize, DecodeError> {
        let mut size = 0usize;
        for index in 0..MAX_SIZE_BYTES {
            let byte = self.read_byte()?;
            size |= usize::from(byte & 0x7f) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(size);
            }
        }
        Err(DecodeError::SizeTooLarge)
    }

    /// Fails if any input is left unread.
    pub fn check_end(&self) -> Result<(), DecodeError> {
        match self.remaining_len() {
            0 => Ok(()),
            n => Err(DecodeError::ExtraTrailingBytes(n)),
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Growable output buffer for an encoder.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    output: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// Writes an unsigned LEB128 size, rejecting sizes above [`MAX_SIZE`].
    #[inline]
    pub fn write_size(&mut self, size: usize) -> Result<(), EncodeError> {
        if size > MAX_SIZE {
            return Err(EncodeError::SizeTooLarge {
                actual: size,
                max_allowed: MAX_SIZE,
            });
        }
        let mut rest = size;
        while rest >= 0x80 {
            self.output.push((rest & 0x7f) as u8 | 0x80);
            rest >>= 7;
        }
        self.output.push(rest as u8);
        Ok(())
    }
}
