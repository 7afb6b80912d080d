//! Data model for SBOR values.
//!
//! This module contains:
//! - Value kinds (the leading tag of every encoded value)
//! - The classification traits generic containers rely on
//! - A dynamic value tree for untyped payloads

pub mod value;
pub mod value_kind;

pub use value::{CustomValue, Value};
pub use value_kind::{
    CUSTOM_VALUE_KIND_START, Categorize, CustomValueKind, SborEnum, SborTuple, VALUE_KIND_ARRAY,
    VALUE_KIND_BOOL, VALUE_KIND_ENUM, VALUE_KIND_I8, VALUE_KIND_I16, VALUE_KIND_I32,
    VALUE_KIND_I64, VALUE_KIND_I128, VALUE_KIND_MAP, VALUE_KIND_STRING, VALUE_KIND_TUPLE,
    VALUE_KIND_U8, VALUE_KIND_U16, VALUE_KIND_U32, VALUE_KIND_U64, VALUE_KIND_U128,
    VALUE_KIND_UNIT, ValueKind,
};
