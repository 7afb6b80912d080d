//! Dynamic values: an untyped tree mirroring any encoded payload.
//!
//! Useful for tooling that handles payloads without their Rust types, and as
//! the one place where a caller can build an array or map whose children
//! don't match the declared kind (which encoding then rejects).

use std::fmt::Debug;

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::model::{CustomValueKind, ValueKind};

/// A custom value of an extension.
pub trait CustomValue<X: CustomValueKind>:
    Encode<X> + Decode<X> + Debug + Clone + PartialEq + Eq
{
    fn get_custom_value_kind(&self) -> X;
}

/// Any encodable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<X: CustomValueKind, Y: CustomValue<X>> {
    Unit,
    Bool {
        value: bool,
    },
    I8 {
        value: i8,
    },
    I16 {
        value: i16,
    },
    I32 {
        value: i32,
    },
    I64 {
        value: i64,
    },
    I128 {
        value: i128,
    },
    U8 {
        value: u8,
    },
    U16 {
        value: u16,
    },
    U32 {
        value: u32,
    },
    U64 {
        value: u64,
    },
    U128 {
        value: u128,
    },
    String {
        value: String,
    },
    Enum {
        discriminator: u8,
        fields: Vec<Value<X, Y>>,
    },
    Array {
        element_value_kind: ValueKind<X>,
        elements: Vec<Value<X, Y>>,
    },
    Tuple {
        fields: Vec<Value<X, Y>>,
    },
    Map {
        key_value_kind: ValueKind<X>,
        value_value_kind: ValueKind<X>,
        entries: Vec<(Value<X, Y>, Value<X, Y>)>,
    },
    Custom {
        value: Y,
    },
}

impl<X: CustomValueKind, Y: CustomValue<X>> Value<X, Y> {
    /// Returns the value kind this value encodes with.
    pub fn get_value_kind(&self) -> ValueKind<X> {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Bool { .. } => ValueKind::Bool,
            Value::I8 { .. } => ValueKind::I8,
            Value::I16 { .. } => ValueKind::I16,
            Value::I32 { .. } => ValueKind::I32,
            Value::I64 { .. } => ValueKind::I64,
            Value::I128 { .. } => ValueKind::I128,
            Value::U8 { .. } => ValueKind::U8,
            Value::U16 { .. } => ValueKind::U16,
            Value::U32 { .. } => ValueKind::U32,
            Value::U64 { .. } => ValueKind::U64,
            Value::U128 { .. } => ValueKind::U128,
            Value::String { .. } => ValueKind::String,
            Value::Enum { .. } => ValueKind::Enum,
            Value::Array { .. } => ValueKind::Array,
            Value::Tuple { .. } => ValueKind::Tuple,
            Value::Map { .. } => ValueKind::Map,
            Value::Custom { value } => ValueKind::Custom(value.get_custom_value_kind()),
        }
    }

    /// Shorthand for a tuple.
    pub fn tuple(fields: impl IntoIterator<Item = Value<X, Y>>) -> Self {
        Value::Tuple {
            fields: fields.into_iter().collect(),
        }
    }

    /// Shorthand for an enum variant.
    pub fn enum_variant(discriminator: u8, fields: impl IntoIterator<Item = Value<X, Y>>) -> Self {
        Value::Enum {
            discriminator,
            fields: fields.into_iter().collect(),
        }
    }
}

impl<X: CustomValueKind, Y: CustomValue<X>> Encode<X> for Value<X, Y> {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(self.get_value_kind())
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        match self {
            Value::Unit => ().encode_body(encoder),
            Value::Bool { value } => value.encode_body(encoder),
            Value::I8 { value } => value.encode_body(encoder),
            Value::I16 { value } => value.encode_body(encoder),
            Value::I32 { value } => value.encode_body(encoder),
            Value::I64 { value } => value.encode_body(encoder),
            Value::I128 { value } => value.encode_body(encoder),
            Value::U8 { value } => value.encode_body(encoder),
            Value::U16 { value } => value.encode_body(encoder),
            Value::U32 { value } => value.encode_body(encoder),
            Value::U64 { value } => value.encode_body(encoder),
            Value::U128 { value } => value.encode_body(encoder),
            Value::String { value } => value.encode_body(encoder),
            Value::Enum {
                discriminator,
                fields,
            } => {
                encoder.write_discriminator(*discriminator)?;
                encoder.write_size(fields.len())?;
                for field in fields {
                    encoder.encode(field)?;
                }
                Ok(())
            }
            Value::Array {
                element_value_kind,
                elements,
            } => {
                encoder.write_value_kind(*element_value_kind)?;
                encoder.write_size(elements.len())?;
                for element in elements {
                    let actual = element.get_value_kind();
                    if actual != *element_value_kind {
                        return Err(EncodeError::MismatchingArrayElementValueKind {
                            element_value_kind: element_value_kind.as_u8(),
                            actual_value_kind: actual.as_u8(),
                        });
                    }
                    encoder.encode_deeper_body(element)?;
                }
                Ok(())
            }
            Value::Tuple { fields } => {
                encoder.write_size(fields.len())?;
                for field in fields {
                    encoder.encode(field)?;
                }
                Ok(())
            }
            Value::Map {
                key_value_kind,
                value_value_kind,
                entries,
            } => {
                encoder.write_value_kind(*key_value_kind)?;
                encoder.write_value_kind(*value_value_kind)?;
                encoder.write_size(entries.len())?;
                for (key, value) in entries {
                    let actual = key.get_value_kind();
                    if actual != *key_value_kind {
                        return Err(EncodeError::MismatchingMapKeyValueKind {
                            key_value_kind: key_value_kind.as_u8(),
                            actual_value_kind: actual.as_u8(),
                        });
                    }
                    let actual = value.get_value_kind();
                    if actual != *value_value_kind {
                        return Err(EncodeError::MismatchingMapValueValueKind {
                            value_value_kind: value_value_kind.as_u8(),
                            actual_value_kind: actual.as_u8(),
                        });
                    }
                    encoder.encode_deeper_body(key)?;
                    encoder.encode_deeper_body(value)?;
                }
                Ok(())
            }
            Value::Custom { value } => value.encode_body(encoder),
        }
    }
}

impl<X: CustomValueKind, Y: CustomValue<X>> Decode<X> for Value<X, Y> {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        // Scalar bodies reuse the typed impls, which check the kind again
        let value = match value_kind {
            ValueKind::Unit => {
                <()>::decode_body_with_value_kind(decoder, value_kind)?;
                Value::Unit
            }
            ValueKind::Bool => Value::Bool {
                value: bool::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::I8 => Value::I8 {
                value: i8::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::I16 => Value::I16 {
                value: i16::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::I32 => Value::I32 {
                value: i32::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::I64 => Value::I64 {
                value: i64::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::I128 => Value::I128 {
                value: i128::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::U8 => Value::U8 {
                value: u8::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::U16 => Value::U16 {
                value: u16::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::U32 => Value::U32 {
                value: u32::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::U64 => Value::U64 {
                value: u64::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::U128 => Value::U128 {
                value: u128::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::String => Value::String {
                value: String::decode_body_with_value_kind(decoder, value_kind)?,
            },
            ValueKind::Enum => {
                let discriminator = decoder.read_discriminator()?;
                let len = decoder.read_size()?;
                let mut fields = Vec::with_capacity(len.min(decoder.remaining_len()));
                for _ in 0..len {
                    fields.push(decoder.decode()?);
                }
                Value::Enum {
                    discriminator,
                    fields,
                }
            }
            ValueKind::Array => {
                let element_value_kind = decoder.read_value_kind()?;
                let len = decoder.read_size()?;
                let mut elements = Vec::with_capacity(len.min(decoder.remaining_len()));
                for _ in 0..len {
                    elements.push(decoder.decode_deeper_body_with_value_kind(element_value_kind)?);
                }
                Value::Array {
                    element_value_kind,
                    elements,
                }
            }
            ValueKind::Tuple => {
                let len = decoder.read_size()?;
                let mut fields = Vec::with_capacity(len.min(decoder.remaining_len()));
                for _ in 0..len {
                    fields.push(decoder.decode()?);
                }
                Value::Tuple { fields }
            }
            ValueKind::Map => {
                let key_value_kind = decoder.read_value_kind()?;
                let value_value_kind = decoder.read_value_kind()?;
                let len = decoder.read_size()?;
                let mut entries = Vec::with_capacity(len.min(decoder.remaining_len()));
                for _ in 0..len {
                    let key = decoder.decode_deeper_body_with_value_kind(key_value_kind)?;
                    let value = decoder.decode_deeper_body_with_value_kind(value_value_kind)?;
                    entries.push((key, value));
                }
                Value::Map {
                    key_value_kind,
                    value_value_kind,
                    entries,
                }
            }
            ValueKind::Custom(_) => Value::Custom {
                value: Y::decode_body_with_value_kind(decoder, value_kind)?,
            },
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::error::EncodeError;
    use crate::extension::basic::{BasicValue, basic_decode, basic_encode};
    use crate::model::ValueKind;

    #[test]
    fn test_value_matches_typed_encoding() {
        let typed = basic_encode(&(7u32, vec![String::from("x")], Some(true))).unwrap();
        let value: BasicValue = basic_decode(&typed).unwrap();
        assert_eq!(basic_encode(&value).unwrap(), typed);
        assert_eq!(
            value,
            BasicValue::tuple([
                BasicValue::U32 { value: 7 },
                BasicValue::Array {
                    element_value_kind: ValueKind::String,
                    elements: vec![BasicValue::String { value: "x".into() }],
                },
                BasicValue::enum_variant(1, [BasicValue::Bool { value: true }]),
            ])
        );
    }

    #[test]
    fn test_heterogeneous_array_rejected() {
        let value = BasicValue::Array {
            element_value_kind: ValueKind::U8,
            elements: vec![BasicValue::U8 { value: 1 }, BasicValue::U16 { value: 2 }],
        };
        assert_eq!(
            basic_encode(&value),
            Err(EncodeError::MismatchingArrayElementValueKind {
                element_value_kind: 0x07,
                actual_value_kind: 0x08,
            })
        );
    }

    #[test]
    fn test_heterogeneous_map_rejected() {
        let value = BasicValue::Map {
            key_value_kind: ValueKind::String,
            value_value_kind: ValueKind::Unit,
            entries: vec![(BasicValue::String { value: "k".into() }, BasicValue::Bool { value: false })],
        };
        assert_eq!(
            basic_encode(&value),
            Err(EncodeError::MismatchingMapValueValueKind {
                value_value_kind: 0x00,
                actual_value_kind: 0x01,
            })
        );
    }

    #[test]
    fn test_empty_tuple_reencodes_identically() {
        let bytes = basic_encode(&BasicValue::tuple([])).unwrap();
        assert_eq!(bytes, vec![0x21, 0x00]);
        let decoded: BasicValue = basic_decode(&bytes).unwrap();
        assert_eq!(decoded, BasicValue::Tuple { fields: vec![] });
        assert_eq!(basic_encode(&decoded).unwrap(), bytes);
    }

    fn arb_leaf() -> impl Strategy<Value = BasicValue> {
        prop_oneof![
            Just(BasicValue::Unit),
            any::<bool>().prop_map(|value| BasicValue::Bool { value }),
            any::<i8>().prop_map(|value| BasicValue::I8 { value }),
            any::<i64>().prop_map(|value| BasicValue::I64 { value }),
            any::<i128>().prop_map(|value| BasicValue::I128 { value }),
            any::<u16>().prop_map(|value| BasicValue::U16 { value }),
            any::<u128>().prop_map(|value| BasicValue::U128 { value }),
            ".{0,12}".prop_map(|value| BasicValue::String { value }),
        ]
    }

    /// Trees whose arrays and maps are homogeneous, as encoding requires.
    fn arb_value() -> impl Strategy<Value = BasicValue> {
        arb_leaf().prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(|fields| BasicValue::Tuple { fields }),
                (any::<u8>(), prop::collection::vec(inner.clone(), 0..4))
                    .prop_map(|(discriminator, fields)| BasicValue::enum_variant(discriminator, fields)),
                prop::collection::vec(inner.clone(), 0..4).prop_map(|children| BasicValue::Array {
                    element_value_kind: ValueKind::Tuple,
                    elements: children.into_iter().map(|child| BasicValue::tuple([child])).collect(),
                }),
                prop::collection::vec(any::<u32>(), 0..8).prop_map(|values| BasicValue::Array {
                    element_value_kind: ValueKind::U32,
                    elements: values.into_iter().map(|value| BasicValue::U32 { value }).collect(),
                }),
                prop::collection::vec((".{0,6}", inner), 0..4).prop_map(|entries| BasicValue::Map {
                    key_value_kind: ValueKind::String,
                    value_value_kind: ValueKind::Enum,
                    entries: entries
                        .into_iter()
                        .map(|(key, value)| {
                            (BasicValue::String { value: key }, BasicValue::enum_variant(0, [value]))
                        })
                        .collect(),
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_value_tree_roundtrip(value in arb_value()) {
            let bytes = basic_encode(&value).unwrap();
            let decoded: BasicValue = basic_decode(&bytes).unwrap();
            prop_assert_eq!(&decoded, &value);
            prop_assert_eq!(basic_encode(&decoded).unwrap(), bytes);
        }
    }
}
