//! Value kinds: the structural tag every encoded value starts with.

use std::fmt::Debug;
use std::hash::Hash;

use crate::codec::primitives::Reader;
use crate::error::DecodeError;

// Scalar kinds
pub const VALUE_KIND_UNIT: u8 = 0x00;
pub const VALUE_KIND_BOOL: u8 = 0x01;
pub const VALUE_KIND_I8: u8 = 0x02;
pub const VALUE_KIND_I16: u8 = 0x03;
pub const VALUE_KIND_I32: u8 = 0x04;
pub const VALUE_KIND_I64: u8 = 0x05;
pub const VALUE_KIND_I128: u8 = 0x06;
pub const VALUE_KIND_U8: u8 = 0x07;
pub const VALUE_KIND_U16: u8 = 0x08;
pub const VALUE_KIND_U32: u8 = 0x09;
pub const VALUE_KIND_U64: u8 = 0x0a;
pub const VALUE_KIND_U128: u8 = 0x0b;
pub const VALUE_KIND_STRING: u8 = 0x0c;

// Container kinds
pub const VALUE_KIND_ARRAY: u8 = 0x20;
pub const VALUE_KIND_TUPLE: u8 = 0x21; // tuples and structs
pub const VALUE_KIND_ENUM: u8 = 0x22;
pub const VALUE_KIND_MAP: u8 = 0x23;

/// First tag available to custom value kinds.
pub const CUSTOM_VALUE_KIND_START: u8 = 0x80;

/// A value kind, parameterized over the custom kinds of an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind<X: CustomValueKind> {
    Unit,
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    String,
    Array,
    Tuple,
    Enum,
    Map,
    Custom(X),
}

impl<X: CustomValueKind> ValueKind<X> {
    /// Returns the wire tag.
    pub fn as_u8(&self) -> u8 {
        match self {
            ValueKind::Unit => VALUE_KIND_UNIT,
            ValueKind::Bool => VALUE_KIND_BOOL,
            ValueKind::I8 => VALUE_KIND_I8,
            ValueKind::I16 => VALUE_KIND_I16,
            ValueKind::I32 => VALUE_KIND_I32,
            ValueKind::I64 => VALUE_KIND_I64,
            ValueKind::I128 => VALUE_KIND_I128,
            ValueKind::U8 => VALUE_KIND_U8,
            ValueKind::U16 => VALUE_KIND_U16,
            ValueKind::U32 => VALUE_KIND_U32,
            ValueKind::U64 => VALUE_KIND_U64,
            ValueKind::U128 => VALUE_KIND_U128,
            ValueKind::String => VALUE_KIND_STRING,
            ValueKind::Array => VALUE_KIND_ARRAY,
            ValueKind::Tuple => VALUE_KIND_TUPLE,
            ValueKind::Enum => VALUE_KIND_ENUM,
            ValueKind::Map => VALUE_KIND_MAP,
            ValueKind::Custom(custom) => custom.as_u8(),
        }
    }

    /// Creates a value kind from its wire tag.
    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            VALUE_KIND_UNIT => Some(ValueKind::Unit),
            VALUE_KIND_BOOL => Some(ValueKind::Bool),
            VALUE_KIND_I8 => Some(ValueKind::I8),
            VALUE_KIND_I16 => Some(ValueKind::I16),
            VALUE_KIND_I32 => Some(ValueKind::I32),
            VALUE_KIND_I64 => Some(ValueKind::I64),
            VALUE_KIND_I128 => Some(ValueKind::I128),
            VALUE_KIND_U8 => Some(ValueKind::U8),
            VALUE_KIND_U16 => Some(ValueKind::U16),
            VALUE_KIND_U32 => Some(ValueKind::U32),
            VALUE_KIND_U64 => Some(ValueKind::U64),
            VALUE_KIND_U128 => Some(ValueKind::U128),
            VALUE_KIND_STRING => Some(ValueKind::String),
            VALUE_KIND_ARRAY => Some(ValueKind::Array),
            VALUE_KIND_TUPLE => Some(ValueKind::Tuple),
            VALUE_KIND_ENUM => Some(ValueKind::Enum),
            VALUE_KIND_MAP => Some(ValueKind::Map),
            id if id >= CUSTOM_VALUE_KIND_START => X::from_u8(id).map(ValueKind::Custom),
            _ => None,
        }
    }

    /// Parses a wire tag, distinguishing unknown base tags from unknown custom tags.
    pub fn try_from_u8(id: u8) -> Result<Self, DecodeError> {
        match Self::from_u8(id) {
            Some(kind) => Ok(kind),
            None if id >= CUSTOM_VALUE_KIND_START => {
                Err(DecodeError::UnexpectedCustomValueKind { actual: id })
            }
            None => Err(DecodeError::UnknownValueKind(id)),
        }
    }
}

/// The custom value kinds of an extension.
///
/// Tags must be at least [`CUSTOM_VALUE_KIND_START`], so a leading byte
/// always tells base and custom kinds apart.
pub trait CustomValueKind: Copy + Debug + Clone + PartialEq + Eq + Hash {
    fn as_u8(&self) -> u8;

    fn from_u8(id: u8) -> Option<Self>;

    /// Reads the body of a custom value of this kind and returns its bytes.
    ///
    /// Lets a traverser step over custom values without knowing their Rust type.
    fn read_body<'de>(&self, reader: &mut Reader<'de>) -> Result<&'de [u8], DecodeError>;
}

/// Types with a fixed value kind.
///
/// Generic containers use this to write (and check) the shared element kind.
pub trait Categorize<X: CustomValueKind> {
    fn value_kind() -> ValueKind<X>;
}

/// Types encoded as a tuple.
pub trait SborTuple<X: CustomValueKind> {
    fn get_length(&self) -> usize;
}

/// Types encoded as an enum.
pub trait SborEnum<X: CustomValueKind> {
    fn get_discriminator(&self) -> u8;

    fn get_length(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::basic::NoCustomValueKind;
    use crate::extension::ledger::LedgerCustomValueKind;

    #[test]
    fn test_base_tags_roundtrip() {
        for id in 0u8..CUSTOM_VALUE_KIND_START {
            if let Some(kind) = ValueKind::<NoCustomValueKind>::from_u8(id) {
                assert_eq!(kind.as_u8(), id);
                assert!(!matches!(kind, ValueKind::Custom(_)));
            }
        }
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(
            ValueKind::<NoCustomValueKind>::try_from_u8(0x0d),
            Err(DecodeError::UnknownValueKind(0x0d))
        );
        assert_eq!(
            ValueKind::<NoCustomValueKind>::try_from_u8(0x80),
            Err(DecodeError::UnexpectedCustomValueKind { actual: 0x80 })
        );
        assert_eq!(
            ValueKind::<LedgerCustomValueKind>::try_from_u8(0x80),
            Ok(ValueKind::Custom(LedgerCustomValueKind::Reference))
        );
    }
}
