//! The ledger extension: node references, owned nodes and decimals.
//!
//! ```text
//! Reference  0x80  NodeId (30 bytes)
//! Own        0x90  NodeId (30 bytes)
//! Decimal    0xa0  i128, little-endian, in units of 10^-18
//! ```
//!
//! The first byte of a node id is its entity type. Entity type `0x00` is
//! reserved and rejected on both sides of the codec.

use std::fmt;

use crate::codec::{self, CodecOptions, Decode, Decoder, Encode, Encoder, Reader};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Categorize, CustomValue, CustomValueKind, Value, ValueKind};
use crate::schema::{
    CustomSchema, Describe, LocalTypeIndex, RustTypeId, TypeData, TypeKind, WellKnownTypeId,
};
use crate::traversal::VecTraverser;

pub const VALUE_KIND_REFERENCE: u8 = 0x80;
pub const VALUE_KIND_OWN: u8 = 0x90;
pub const VALUE_KIND_DECIMAL: u8 = 0xa0;

pub const NODE_ID_LENGTH: usize = 30;
pub const DECIMAL_LENGTH: usize = 16;

/// Custom value kinds of the ledger extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerCustomValueKind {
    Reference,
    Own,
    Decimal,
}

impl CustomValueKind for LedgerCustomValueKind {
    fn as_u8(&self) -> u8 {
        match self {
            LedgerCustomValueKind::Reference => VALUE_KIND_REFERENCE,
            LedgerCustomValueKind::Own => VALUE_KIND_OWN,
            LedgerCustomValueKind::Decimal => VALUE_KIND_DECIMAL,
        }
    }

    fn from_u8(id: u8) -> Option<Self> {
        match id {
            VALUE_KIND_REFERENCE => Some(LedgerCustomValueKind::Reference),
            VALUE_KIND_OWN => Some(LedgerCustomValueKind::Own),
            VALUE_KIND_DECIMAL => Some(LedgerCustomValueKind::Decimal),
            _ => None,
        }
    }

    fn read_body<'de>(&self, reader: &mut Reader<'de>) -> Result<&'de [u8], DecodeError> {
        match self {
            LedgerCustomValueKind::Reference | LedgerCustomValueKind::Own => {
                let bytes = reader.read_bytes(NODE_ID_LENGTH)?;
                if bytes[0] == NodeId::RESERVED_ENTITY_TYPE {
                    return Err(DecodeError::InvalidCustomValue);
                }
                Ok(bytes)
            }
            LedgerCustomValueKind::Decimal => reader.read_bytes(DECIMAL_LENGTH),
        }
    }
}

impl CustomSchema for LedgerCustomValueKind {
    fn resolve_custom_well_known_type(id: WellKnownTypeId) -> Option<TypeData<Self, LocalTypeIndex>> {
        let kind = Self::from_u8(id.as_u8())?;
        let name = match kind {
            LedgerCustomValueKind::Reference => "Reference",
            LedgerCustomValueKind::Own => "Own",
            LedgerCustomValueKind::Decimal => "Decimal",
        };
        Some(TypeData::named_no_child_names(name, TypeKind::Custom(kind)))
    }
}

// =============================================================================
// NODE IDS
// =============================================================================

/// Address of a node in the state tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub [u8; NODE_ID_LENGTH]);

impl NodeId {
    pub const RESERVED_ENTITY_TYPE: u8 = 0x00;

    /// Creates a node id from an entity type and 29 bytes of address.
    pub fn new(entity_type: u8, address: &[u8; NODE_ID_LENGTH - 1]) -> Self {
        let mut bytes = [0u8; NODE_ID_LENGTH];
        bytes[0] = entity_type;
        bytes[1..].copy_from_slice(address);
        Self(bytes)
    }

    pub fn entity_type(&self) -> u8 {
        self.0[0]
    }

    pub fn as_bytes(&self) -> &[u8; NODE_ID_LENGTH] {
        &self.0
    }

    fn encode_checked(&self, encoder: &mut Encoder<LedgerCustomValueKind>) -> Result<(), EncodeError> {
        if self.entity_type() == Self::RESERVED_ENTITY_TYPE {
            return Err(EncodeError::InvalidCustomValue("reserved entity type"));
        }
        encoder.write_slice(&self.0)
    }

    fn decode_checked(decoder: &mut Decoder<'_, LedgerCustomValueKind>) -> Result<Self, DecodeError> {
        let bytes = decoder.read_array::<NODE_ID_LENGTH>()?;
        if bytes[0] == Self::RESERVED_ENTITY_TYPE {
            return Err(DecodeError::InvalidCustomValue);
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A reference to a node owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference(pub NodeId);

/// Ownership of a child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Own(pub NodeId);

macro_rules! impl_node_id_codec {
    ($type:ident, $kind:ident, $name:literal) => {
        impl Categorize<LedgerCustomValueKind> for $type {
            #[inline]
            fn value_kind() -> ValueKind<LedgerCustomValueKind> {
                ValueKind::Custom(LedgerCustomValueKind::$kind)
            }
        }

        impl Encode<LedgerCustomValueKind> for $type {
            #[inline]
            fn encode_value_kind(
                &self,
                encoder: &mut Encoder<LedgerCustomValueKind>,
            ) -> Result<(), EncodeError> {
                encoder.write_value_kind(Self::value_kind())
            }

            #[inline]
            fn encode_body(&self, encoder: &mut Encoder<LedgerCustomValueKind>) -> Result<(), EncodeError> {
                self.0.encode_checked(encoder)
            }
        }

        impl Decode<LedgerCustomValueKind> for $type {
            fn decode_body_with_value_kind(
                decoder: &mut Decoder<'_, LedgerCustomValueKind>,
                value_kind: ValueKind<LedgerCustomValueKind>,
            ) -> Result<Self, DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, Self::value_kind())?;
                NodeId::decode_checked(decoder).map($type)
            }
        }

        impl Describe<LedgerCustomValueKind> for $type {
            fn type_id() -> RustTypeId {
                RustTypeId::WellKnown(WellKnownTypeId::of(LedgerCustomValueKind::$kind.as_u8()))
            }

            fn type_data() -> TypeData<LedgerCustomValueKind, RustTypeId> {
                TypeData::named_no_child_names($name, TypeKind::Custom(LedgerCustomValueKind::$kind))
            }
        }
    };
}

impl_node_id_codec!(Reference, Reference, "Reference");
impl_node_id_codec!(Own, Own, "Own");

// =============================================================================
// DECIMAL
// =============================================================================

/// Fixed-point decimal with 18 fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(i128);

impl Decimal {
    pub const SCALE: u32 = 18;
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(10i128.pow(Self::SCALE));
    pub const MAX: Self = Self(i128::MAX);

    /// Creates a decimal from a count of 10^-18 units.
    pub const fn from_attos(attos: i128) -> Self {
        Self(attos)
    }

    pub const fn attos(&self) -> i128 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl From<u64> for Decimal {
    fn from(whole: u64) -> Self {
        // u64::MAX * 10^18 < i128::MAX
        Self(i128::from(whole) * Self::ONE.0)
    }
}

impl From<i64> for Decimal {
    fn from(whole: i64) -> Self {
        Self(i128::from(whole) * Self::ONE.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = Self::ONE.0.unsigned_abs();
        let abs = self.0.unsigned_abs();
        let (whole, fraction) = (abs / unit, abs % unit);
        if self.0 < 0 {
            write!(f, "-")?;
        }
        if fraction == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{fraction:018}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

impl Categorize<LedgerCustomValueKind> for Decimal {
    #[inline]
    fn value_kind() -> ValueKind<LedgerCustomValueKind> {
        ValueKind::Custom(LedgerCustomValueKind::Decimal)
    }
}

impl Encode<LedgerCustomValueKind> for Decimal {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<LedgerCustomValueKind>) -> Result<(), EncodeError> {
        encoder.write_value_kind(Self::value_kind())
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<LedgerCustomValueKind>) -> Result<(), EncodeError> {
        encoder.write_slice(&self.0.to_le_bytes())
    }
}

impl Decode<LedgerCustomValueKind> for Decimal {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, LedgerCustomValueKind>,
        value_kind: ValueKind<LedgerCustomValueKind>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, Self::value_kind())?;
        Ok(Self(i128::from_le_bytes(decoder.read_array::<DECIMAL_LENGTH>()?)))
    }
}

impl Describe<LedgerCustomValueKind> for Decimal {
    fn type_id() -> RustTypeId {
        RustTypeId::WellKnown(WellKnownTypeId::of(VALUE_KIND_DECIMAL))
    }

    fn type_data() -> TypeData<LedgerCustomValueKind, RustTypeId> {
        TypeData::named_no_child_names("Decimal", TypeKind::Custom(LedgerCustomValueKind::Decimal))
    }
}

// =============================================================================
// DYNAMIC VALUES
// =============================================================================

/// Any custom value of the ledger extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCustomValue {
    Reference(Reference),
    Own(Own),
    Decimal(Decimal),
}

impl Encode<LedgerCustomValueKind> for LedgerCustomValue {
    fn encode_value_kind(&self, encoder: &mut Encoder<LedgerCustomValueKind>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Custom(self.get_custom_value_kind()))
    }

    fn encode_body(&self, encoder: &mut Encoder<LedgerCustomValueKind>) -> Result<(), EncodeError> {
        match self {
            LedgerCustomValue::Reference(value) => value.encode_body(encoder),
            LedgerCustomValue::Own(value) => value.encode_body(encoder),
            LedgerCustomValue::Decimal(value) => value.encode_body(encoder),
        }
    }
}

impl Decode<LedgerCustomValueKind> for LedgerCustomValue {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, LedgerCustomValueKind>,
        value_kind: ValueKind<LedgerCustomValueKind>,
    ) -> Result<Self, DecodeError> {
        match value_kind {
            ValueKind::Custom(LedgerCustomValueKind::Reference) => {
                Reference::decode_body_with_value_kind(decoder, value_kind).map(Self::Reference)
            }
            ValueKind::Custom(LedgerCustomValueKind::Own) => {
                Own::decode_body_with_value_kind(decoder, value_kind).map(Self::Own)
            }
            ValueKind::Custom(LedgerCustomValueKind::Decimal) => {
                Decimal::decode_body_with_value_kind(decoder, value_kind).map(Self::Decimal)
            }
            other => Err(DecodeError::UnexpectedCustomValueKind {
                actual: other.as_u8(),
            }),
        }
    }
}

impl CustomValue<LedgerCustomValueKind> for LedgerCustomValue {
    fn get_custom_value_kind(&self) -> LedgerCustomValueKind {
        match self {
            LedgerCustomValue::Reference(_) => LedgerCustomValueKind::Reference,
            LedgerCustomValue::Own(_) => LedgerCustomValueKind::Own,
            LedgerCustomValue::Decimal(_) => LedgerCustomValueKind::Decimal,
        }
    }
}

pub type LedgerValueKind = ValueKind<LedgerCustomValueKind>;
pub type LedgerValue = Value<LedgerCustomValueKind, LedgerCustomValue>;
pub type LedgerEncoder = Encoder<LedgerCustomValueKind>;
pub type LedgerDecoder<'a> = Decoder<'a, LedgerCustomValueKind>;
pub type LedgerTraverser<'a> = VecTraverser<'a, LedgerCustomValueKind>;

/// Encodes a value with the ledger extension.
pub fn ledger_encode<T: Encode<LedgerCustomValueKind> + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    codec::encode(value)
}

/// Decodes a complete payload with the ledger extension.
pub fn ledger_decode<T: Decode<LedgerCustomValueKind>>(input: &[u8]) -> Result<T, DecodeError> {
    codec::decode(input)
}

pub fn ledger_decode_with_options<T: Decode<LedgerCustomValueKind>>(
    input: &[u8],
    options: CodecOptions,
) -> Result<T, DecodeError> {
    codec::decode_with_options(input, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(entity_type: u8, fill: u8) -> NodeId {
        NodeId::new(entity_type, &[fill; NODE_ID_LENGTH - 1])
    }

    #[test]
    fn test_reference_bytes() {
        let bytes = ledger_encode(&Reference(node(0x5d, 0xab))).unwrap();
        assert_eq!(bytes.len(), 1 + NODE_ID_LENGTH);
        assert_eq!(bytes[0], VALUE_KIND_REFERENCE);
        assert_eq!(bytes[1], 0x5d);
        assert_eq!(ledger_decode::<Reference>(&bytes).unwrap(), Reference(node(0x5d, 0xab)));
    }

    #[test]
    fn test_reserved_entity_type_rejected() {
        assert_eq!(
            ledger_encode(&Own(node(0x00, 1))),
            Err(EncodeError::InvalidCustomValue("reserved entity type"))
        );

        let mut bytes = ledger_encode(&Own(node(0x0d, 1))).unwrap();
        bytes[1] = 0x00;
        assert_eq!(ledger_decode::<Own>(&bytes), Err(DecodeError::InvalidCustomValue));
    }

    #[test]
    fn test_reference_is_not_own() {
        let bytes = ledger_encode(&Reference(node(0x5d, 2))).unwrap();
        assert_eq!(
            ledger_decode::<Own>(&bytes),
            Err(DecodeError::UnexpectedValueKind {
                expected: VALUE_KIND_OWN,
                actual: VALUE_KIND_REFERENCE,
            })
        );
    }

    #[test]
    fn test_custom_array_homogeneity_on_decode() {
        let references = vec![Reference(node(0x5d, 1)), Reference(node(0x5d, 2))];
        let bytes = ledger_encode(&references).unwrap();
        assert_eq!(
            ledger_decode::<Vec<Decimal>>(&bytes),
            Err(DecodeError::UnexpectedValueKind {
                expected: VALUE_KIND_DECIMAL,
                actual: VALUE_KIND_REFERENCE,
            })
        );
    }

    #[test]
    fn test_custom_array_homogeneity_on_encode() {
        let value = LedgerValue::Array {
            element_value_kind: ValueKind::Custom(LedgerCustomValueKind::Decimal),
            elements: vec![
                LedgerValue::Custom {
                    value: LedgerCustomValue::Decimal(Decimal::ONE),
                },
                LedgerValue::Custom {
                    value: LedgerCustomValue::Own(Own(node(0x0d, 3))),
                },
            ],
        };
        assert_eq!(
            ledger_encode(&value),
            Err(EncodeError::MismatchingArrayElementValueKind {
                element_value_kind: VALUE_KIND_DECIMAL,
                actual_value_kind: VALUE_KIND_OWN,
            })
        );
    }

    #[test]
    fn test_decimal_codec_and_display() {
        let amount = Decimal::from(100u64);
        let bytes = ledger_encode(&amount).unwrap();
        assert_eq!(bytes.len(), 1 + DECIMAL_LENGTH);
        assert_eq!(ledger_decode::<Decimal>(&bytes).unwrap(), amount);

        assert_eq!(amount.to_string(), "100");
        assert_eq!(Decimal::from_attos(-1_500_000_000_000_000_000).to_string(), "-1.5");
        assert_eq!(Decimal::from_attos(1).to_string(), "0.000000000000000001");
        assert_eq!(Decimal::MAX.checked_add(Decimal::from_attos(1)), None);
    }

    #[test]
    fn test_decimal_arithmetic() {
        let half = Decimal::from_attos(Decimal::ONE.attos() / 2);
        assert_eq!(half.checked_add(half), Some(Decimal::ONE));
        assert_eq!(Decimal::ZERO.checked_sub(half).map(|d| d.to_string()).as_deref(), Some("-0.5"));
        assert_eq!(Decimal::from(3i64).attos(), 3 * Decimal::ONE.attos());
        assert_eq!(
            Decimal::from_attos(i128::MIN).checked_sub(Decimal::from_attos(1)),
            None
        );
    }

    #[test]
    fn test_dynamic_value_roundtrip() {
        let typed = ledger_encode(&(Decimal::ONE, vec![Own(node(0x0d, 9))])).unwrap();
        let value: LedgerValue = ledger_decode(&typed).unwrap();
        assert_eq!(ledger_encode(&value).unwrap(), typed);
    }
}
