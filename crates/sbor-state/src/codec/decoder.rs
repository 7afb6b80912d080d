//! The value decoder and the `Decode` trait.

use std::marker::PhantomData;

use crate::codec::primitives::Reader;
use crate::error::DecodeError;
use crate::model::{CustomValueKind, ValueKind};

/// A value which can be decoded.
pub trait Decode<X: CustomValueKind>: Sized {
    /// Decodes the body of a value whose kind the caller already read.
    ///
    /// Implementations must check `value_kind` before reading anything, so
    /// a mismatched tag fails instead of being coerced.
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError>;
}

/// Decodes values from a byte slice, tracking nesting depth.
#[derive(Debug, Clone)]
pub struct Decoder<'de, X: CustomValueKind> {
    reader: Reader<'de>,
    stack_depth: usize,
    max_depth: usize,
    phantom: PhantomData<X>,
}

impl<'de, X: CustomValueKind> Decoder<'de, X> {
    pub fn new(input: &'de [u8], max_depth: usize) -> Self {
        Self {
            reader: Reader::new(input),
            stack_depth: 0,
            max_depth,
            phantom: PhantomData,
        }
    }

    /// Decodes a complete value: kind, then body.
    pub fn decode<T: Decode<X>>(&mut self) -> Result<T, DecodeError> {
        let value_kind = self.read_value_kind()?;
        self.decode_deeper_body_with_value_kind(value_kind)
    }

    /// Decodes a body one level deeper than the current value.
    pub fn decode_deeper_body_with_value_kind<T: Decode<X>>(
        &mut self,
        value_kind: ValueKind<X>,
    ) -> Result<T, DecodeError> {
        self.track_stack_depth_increase()?;
        let decoded = T::decode_body_with_value_kind(self, value_kind)?;
        self.stack_depth -= 1;
        Ok(decoded)
    }

    #[inline]
    pub fn read_value_kind(&mut self) -> Result<ValueKind<X>, DecodeError> {
        let id = self.reader.read_byte()?;
        ValueKind::try_from_u8(id)
    }

    #[inline]
    pub fn read_discriminator(&mut self) -> Result<u8, DecodeError> {
        self.reader.read_byte()
    }

    #[inline]
    pub fn read_size(&mut self) -> Result<usize, DecodeError> {
        self.reader.read_size()
    }

    /// Checks a kind read earlier against the one the caller expects.
    pub fn check_preloaded_value_kind(
        &self,
        value_kind: ValueKind<X>,
        expected: ValueKind<X>,
    ) -> Result<ValueKind<X>, DecodeError> {
        if value_kind == expected {
            Ok(value_kind)
        } else {
            Err(DecodeError::UnexpectedValueKind {
                expected: expected.as_u8(),
                actual: value_kind.as_u8(),
            })
        }
    }

    pub fn read_and_check_value_kind(
        &mut self,
        expected: ValueKind<X>,
    ) -> Result<ValueKind<X>, DecodeError> {
        let value_kind = self.read_value_kind()?;
        self.check_preloaded_value_kind(value_kind, expected)
    }

    pub fn read_and_check_size(&mut self, expected: usize) -> Result<(), DecodeError> {
        let len = self.read_size()?;
        if len != expected {
            return Err(DecodeError::UnexpectedSize {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.reader.read_byte()
    }

    #[inline]
    pub fn read_slice(&mut self, n: usize) -> Result<&'de [u8], DecodeError> {
        self.reader.read_bytes(n)
    }

    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.reader.read_array()
    }

    /// Number of unread bytes. Bounds pre-allocation for declared lengths.
    pub fn remaining_len(&self) -> usize {
        self.reader.remaining_len()
    }

    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn check_end(&self) -> Result<(), DecodeError> {
        self.reader.check_end()
    }

    fn track_stack_depth_increase(&mut self) -> Result<(), DecodeError> {
        self.stack_depth += 1;
        if self.stack_depth > self.max_depth {
            return Err(DecodeError::MaxDepthExceeded(self.max_depth));
        }
        Ok(())
    }
}
