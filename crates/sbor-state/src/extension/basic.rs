//! The basic extension: no custom value kinds at all.

use crate::codec::{self, CodecOptions, Decode, Decoder, Encode, Encoder, Reader};
use crate::error::{DecodeError, EncodeError};
use crate::model::{CustomValue, CustomValueKind, Value, ValueKind};
use crate::schema::{CustomSchema, LocalTypeIndex, TypeData, WellKnownTypeId};
use crate::traversal::VecTraverser;

/// Custom value kind of the basic extension. Has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoCustomValueKind {}

impl CustomValueKind for NoCustomValueKind {
    fn as_u8(&self) -> u8 {
        match *self {}
    }

    fn from_u8(_id: u8) -> Option<Self> {
        None
    }

    fn read_body<'de>(&self, _reader: &mut Reader<'de>) -> Result<&'de [u8], DecodeError> {
        match *self {}
    }
}

impl CustomSchema for NoCustomValueKind {
    fn resolve_custom_well_known_type(_id: WellKnownTypeId) -> Option<TypeData<Self, LocalTypeIndex>> {
        None
    }
}

/// Custom value of the basic extension. Has no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoCustomValue {}

impl Encode<NoCustomValueKind> for NoCustomValue {
    fn encode_value_kind(&self, _encoder: &mut Encoder<NoCustomValueKind>) -> Result<(), EncodeError> {
        match *self {}
    }

    fn encode_body(&self, _encoder: &mut Encoder<NoCustomValueKind>) -> Result<(), EncodeError> {
        match *self {}
    }
}

impl Decode<NoCustomValueKind> for NoCustomValue {
    fn decode_body_with_value_kind(
        _decoder: &mut Decoder<'_, NoCustomValueKind>,
        value_kind: ValueKind<NoCustomValueKind>,
    ) -> Result<Self, DecodeError> {
        Err(DecodeError::UnexpectedCustomValueKind {
            actual: value_kind.as_u8(),
        })
    }
}

impl CustomValue<NoCustomValueKind> for NoCustomValue {
    fn get_custom_value_kind(&self) -> NoCustomValueKind {
        match *self {}
    }
}

pub type BasicValueKind = ValueKind<NoCustomValueKind>;
pub type BasicValue = Value<NoCustomValueKind, NoCustomValue>;
pub type BasicEncoder = Encoder<NoCustomValueKind>;
pub type BasicDecoder<'a> = Decoder<'a, NoCustomValueKind>;
pub type BasicTraverser<'a> = VecTraverser<'a, NoCustomValueKind>;

/// Encodes a value with the basic extension.
pub fn basic_encode<T: Encode<NoCustomValueKind> + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    codec::encode(value)
}

/// Decodes a complete payload with the basic extension.
pub fn basic_decode<T: Decode<NoCustomValueKind>>(input: &[u8]) -> Result<T, DecodeError> {
    codec::decode(input)
}

pub fn basic_decode_with_options<T: Decode<NoCustomValueKind>>(
    input: &[u8],
    options: CodecOptions,
) -> Result<T, DecodeError> {
    codec::decode_with_options(input, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_tags_unknown() {
        for id in 0x80..=0xffu8 {
            assert!(NoCustomValueKind::from_u8(id).is_none());
        }
        assert_eq!(
            basic_decode::<BasicValue>(&[0x80, 0x00]),
            Err(DecodeError::UnexpectedCustomValueKind { actual: 0x80 })
        );
    }
}
