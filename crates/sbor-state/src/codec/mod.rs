//! Binary encoding/decoding of SBOR values.
//!
//! Every value is a one-byte value kind followed by a kind-specific body.
//! [`Encode`] and [`Decode`] are implemented here for the standard library
//! types; domain types implement them with [`impl_codec_for_struct!`] or
//! [`define_versioned!`], or by hand.
//!
//! [`impl_codec_for_struct!`]: crate::impl_codec_for_struct
//! [`define_versioned!`]: crate::define_versioned

pub mod basic;
pub mod collections;
pub mod decoder;
pub mod encoder;
pub mod enums;
pub mod primitives;
pub mod tuple;

pub use decoder::{Decode, Decoder};
pub use encoder::{Encode, Encoder};
pub use primitives::{Reader, Writer};

use crate::error::{DecodeError, EncodeError};
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::model::CustomValueKind;

/// Options for encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Deepest nesting allowed. The root value sits at depth 1.
    pub max_depth: usize,

    /// Reject input with bytes left after the root value.
    ///
    /// Only affects decoding. Disable it to read a value from the front of a
    /// larger buffer.
    pub check_exact_end: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            check_exact_end: true,
        }
    }
}

impl CodecOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Allows trailing bytes after the decoded value.
    pub fn allow_trailing_bytes(mut self) -> Self {
        self.check_exact_end = false;
        self
    }
}

/// Encodes a value with default options.
pub fn encode<X: CustomValueKind, T: Encode<X> + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(value, CodecOptions::default())
}

/// Encodes a value with the given options.
pub fn encode_with_options<X: CustomValueKind, T: Encode<X> + ?Sized>(
    value: &T,
    options: CodecOptions,
) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new(options.max_depth);
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// Decodes a complete payload with default options.
pub fn decode<X: CustomValueKind, T: Decode<X>>(input: &[u8]) -> Result<T, DecodeError> {
    decode_with_options(input, CodecOptions::default())
}

/// Decodes a payload with the given options.
pub fn decode_with_options<X: CustomValueKind, T: Decode<X>>(
    input: &[u8],
    options: CodecOptions,
) -> Result<T, DecodeError> {
    let mut decoder = Decoder::new(input, options.max_depth);
    let value = decoder.decode()?;
    if options.check_exact_end {
        decoder.check_end()?;
    }
    Ok(value)
}
