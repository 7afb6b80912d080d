//! Substates: the persisted unit of state.
//!
//! A substate wraps one versioned payload together with its lock status.
//! Substates are only built from typed payloads, through the payload traits
//! in [`payloads`], or decoded from bytes with [`decode_substate`]. They are
//! written by replacing the payload as a whole.

use tracing::debug;

use crate::codec::{self, Decode, Encode};
use crate::error::{DecodeError, EncodeError, PayloadValidationError, SubstateError};
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::model::CustomValueKind;
use crate::schema::{CustomSchema, Describe, generate_full_schema_from_single_type};
use crate::validate::validate_payload_against_schema;

/// Codec and schema impls for a substate: a single-generation enum `V1`
/// wrapping a two-field struct of the value and its lock status.
macro_rules! impl_substate_codec {
    ($substate:ident, $inner:ident, $value_field:ident : $value_type:ty) => {
        impl<X: $crate::model::CustomValueKind, V> $crate::model::Categorize<X> for $inner<V> {
            #[inline]
            fn value_kind() -> $crate::model::ValueKind<X> {
                $crate::model::ValueKind::Tuple
            }
        }

        impl<X: $crate::model::CustomValueKind, V: $crate::codec::Encode<X>> $crate::codec::Encode<X>
            for $inner<V>
        {
            #[inline]
            fn encode_value_kind(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> Result<(), $crate::error::EncodeError> {
                encoder.write_value_kind($crate::model::ValueKind::Tuple)
            }

            fn encode_body(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> Result<(), $crate::error::EncodeError> {
                encoder.write_size(2)?;
                encoder.encode(&self.$value_field)?;
                encoder.encode(&self.lock_status)
            }
        }

        impl<X: $crate::model::CustomValueKind, V: $crate::codec::Decode<X>> $crate::codec::Decode<X>
            for $inner<V>
        {
            fn decode_body_with_value_kind(
                decoder: &mut $crate::codec::Decoder<'_, X>,
                value_kind: $crate::model::ValueKind<X>,
            ) -> Result<Self, $crate::error::DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, $crate::model::ValueKind::Tuple)?;
                decoder.read_and_check_size(2)?;
                let $value_field = decoder.decode()?;
                let lock_status = decoder.decode()?;
                Ok(Self {
                    $value_field,
                    lock_status,
                })
            }
        }

        impl<X: $crate::schema::CustomSchema, V: $crate::schema::Describe<X>> $crate::schema::Describe<X>
            for $inner<V>
        {
            fn type_id() -> $crate::schema::RustTypeId {
                $crate::schema::novel_type_id(stringify!($inner), &[V::type_id()])
            }

            fn type_data() -> $crate::schema::TypeData<X, $crate::schema::RustTypeId> {
                $crate::schema::TypeData::struct_with_named_fields(
                    stringify!($inner),
                    vec![
                        (
                            stringify!($value_field),
                            <$value_type as $crate::schema::Describe<X>>::type_id(),
                        ),
                        (
                            "lock_status",
                            <$crate::substate::LockStatus as $crate::schema::Describe<X>>::type_id(),
                        ),
                    ],
                )
            }

            fn add_all_dependencies(aggregator: &mut $crate::schema::TypeAggregator<X>) {
                aggregator.add_child_type_and_descendents::<$value_type>();
                aggregator.add_child_type_and_descendents::<$crate::substate::LockStatus>();
            }
        }

        impl<X: $crate::model::CustomValueKind, V> $crate::model::Categorize<X> for $substate<V> {
            #[inline]
            fn value_kind() -> $crate::model::ValueKind<X> {
                $crate::model::ValueKind::Enum
            }
        }

        impl<X: $crate::model::CustomValueKind, V: $crate::codec::Encode<X>> $crate::codec::Encode<X>
            for $substate<V>
        {
            #[inline]
            fn encode_value_kind(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> Result<(), $crate::error::EncodeError> {
                encoder.write_value_kind($crate::model::ValueKind::Enum)
            }

            fn encode_body(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> Result<(), $crate::error::EncodeError> {
                match self {
                    Self::V1(inner) => {
                        encoder.write_discriminator(0)?;
                        encoder.write_size(1)?;
                        encoder.encode(inner)
                    }
                }
            }
        }

        impl<X: $crate::model::CustomValueKind, V: $crate::codec::Decode<X>> $crate::codec::Decode<X>
            for $substate<V>
        {
            fn decode_body_with_value_kind(
                decoder: &mut $crate::codec::Decoder<'_, X>,
                value_kind: $crate::model::ValueKind<X>,
            ) -> Result<Self, $crate::error::DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, $crate::model::ValueKind::Enum)?;
                match decoder.read_discriminator()? {
                    0 => {
                        decoder.read_and_check_size(1)?;
                        Ok(Self::V1(decoder.decode()?))
                    }
                    other => Err($crate::error::DecodeError::UnknownDiscriminator(other)),
                }
            }
        }

        impl<X: $crate::schema::CustomSchema, V: $crate::schema::Describe<X>> $crate::schema::Describe<X>
            for $substate<V>
        {
            fn type_id() -> $crate::schema::RustTypeId {
                $crate::schema::novel_type_id(stringify!($substate), &[V::type_id()])
            }

            fn type_data() -> $crate::schema::TypeData<X, $crate::schema::RustTypeId> {
                $crate::schema::TypeData::enum_variants(
                    stringify!($substate),
                    ::std::collections::BTreeMap::from([(
                        0,
                        ("V1", vec![<$inner<V> as $crate::schema::Describe<X>>::type_id()]),
                    )]),
                )
            }

            fn add_all_dependencies(aggregator: &mut $crate::schema::TypeAggregator<X>) {
                aggregator.add_child_type_and_descendents::<$inner<V>>();
            }
        }
    };
}

pub mod field;
pub mod index;
pub mod key_value;
pub mod lock;
pub mod payloads;

pub use field::{FieldSubstate, FieldSubstateV1};
pub use index::{IndexEntrySubstate, IndexEntrySubstateV1, SortedIndexEntrySubstate};
pub use key_value::{KeyValueEntrySubstate, KeyValueEntrySubstateV1};
pub use lock::LockStatus;
pub use payloads::{
    FieldContentSource, FieldPayload, IndexEntryContentSource, IndexEntryPayload,
    KeyValueEntryContentSource, KeyValueEntryPayload, SortedIndexEntryContentSource,
    SortedIndexEntryPayload,
};

/// Fails with [`SubstateError::Locked`] if a write would touch a locked substate.
fn check_writable(lock_status: LockStatus, substate: &'static str) -> Result<(), SubstateError> {
    if lock_status.is_locked() {
        debug!(substate, "rejected write to locked substate");
        return Err(SubstateError::Locked);
    }
    Ok(())
}

/// Encodes a substate for storage.
pub fn encode_substate<X: CustomValueKind, S: Encode<X>>(substate: &S) -> Result<Vec<u8>, EncodeError> {
    codec::encode(substate)
}

/// Decodes stored bytes into the expected substate type.
pub fn decode_substate<X: CustomValueKind, S: Decode<X>>(bytes: &[u8]) -> Result<S, DecodeError> {
    codec::decode(bytes)
}

/// Checks stored bytes against the schema of `S` without decoding them.
pub fn validate_substate_bytes<X: CustomSchema, S: Describe<X>>(
    bytes: &[u8],
) -> Result<(), PayloadValidationError> {
    let (type_index, schema) = generate_full_schema_from_single_type::<S, X>()?;
    validate_payload_against_schema(bytes, &schema, type_index, DEFAULT_MAX_DEPTH)
}
