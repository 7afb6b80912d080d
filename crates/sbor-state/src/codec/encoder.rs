//! The value encoder and the `Encode` trait.

use std::marker::PhantomData;

use crate::codec::primitives::Writer;
use crate::error::EncodeError;
use crate::limits::DEFAULT_ENCODE_CAPACITY;
use crate::model::{CustomValueKind, ValueKind};

/// A value which can be encoded.
///
/// Encoding is split in two so containers holding a shared element kind
/// (arrays, maps) can write the kind once and then only the bodies.
pub trait Encode<X: CustomValueKind> {
    /// Writes the leading value kind.
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError>;

    /// Writes the kind-specific body.
    ///
    /// Containers must encode their children with [`Encoder::encode`] or
    /// [`Encoder::encode_deeper_body`] so depth is tracked.
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError>;
}

/// Encodes values into an owned buffer, tracking nesting depth.
#[derive(Debug)]
pub struct Encoder<X: CustomValueKind> {
    writer: Writer,
    stack_depth: usize,
    max_depth: usize,
    phantom: PhantomData<X>,
}

impl<X: CustomValueKind> Encoder<X> {
    pub fn new(max_depth: usize) -> Self {
        Self::with_writer(Writer::with_capacity(DEFAULT_ENCODE_CAPACITY), max_depth)
    }

    pub fn with_writer(writer: Writer, max_depth: usize) -> Self {
        Self {
            writer,
            stack_depth: 0,
            max_depth,
            phantom: PhantomData,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.writer.as_bytes()
    }

    /// Encodes a complete value: kind, then body.
    pub fn encode<T: Encode<X> + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.encode_value_kind(self)?;
        self.encode_deeper_body(value)
    }

    /// Encodes a value's body one level deeper than the current value.
    pub fn encode_deeper_body<T: Encode<X> + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.track_stack_depth_increase()?;
        value.encode_body(self)?;
        self.stack_depth -= 1;
        Ok(())
    }

    #[inline]
    pub fn write_value_kind(&mut self, value_kind: ValueKind<X>) -> Result<(), EncodeError> {
        self.writer.write_byte(value_kind.as_u8());
        Ok(())
    }

    #[inline]
    pub fn write_discriminator(&mut self, discriminator: u8) -> Result<(), EncodeError> {
        self.writer.write_byte(discriminator);
        Ok(())
    }

    #[inline]
    pub fn write_size(&mut self, size: usize) -> Result<(), EncodeError> {
        self.writer.write_size(size)
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.writer.write_byte(byte);
        Ok(())
    }

    #[inline]
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), EncodeError> {
        self.writer.write_bytes(slice);
        Ok(())
    }

    fn track_stack_depth_increase(&mut self) -> Result<(), EncodeError> {
        self.stack_depth += 1;
        if self.stack_depth > self.max_depth {
            return Err(EncodeError::MaxDepthExceeded(self.max_depth));
        }
        Ok(())
    }
}
