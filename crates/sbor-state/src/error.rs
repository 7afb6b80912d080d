//! Error types for encoding, decoding, schema handling and substates.

use thiserror::Error;

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("maximum encoding depth {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error("size {actual} exceeds maximum {max_allowed}")]
    SizeTooLarge { actual: usize, max_allowed: usize },

    #[error("array declares element kind 0x{element_value_kind:02x} but holds 0x{actual_value_kind:02x}")]
    MismatchingArrayElementValueKind {
        element_value_kind: u8,
        actual_value_kind: u8,
    },

    #[error("map declares key kind 0x{key_value_kind:02x} but holds 0x{actual_value_kind:02x}")]
    MismatchingMapKeyValueKind {
        key_value_kind: u8,
        actual_value_kind: u8,
    },

    #[error("map declares value kind 0x{value_value_kind:02x} but holds 0x{actual_value_kind:02x}")]
    MismatchingMapValueValueKind {
        value_value_kind: u8,
        actual_value_kind: u8,
    },

    #[error("invalid custom value: {0}")]
    InvalidCustomValue(&'static str),
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{0} trailing bytes after payload")]
    ExtraTrailingBytes(usize),

    #[error("unexpected end of input: required {required} bytes, {remaining} remaining")]
    BufferUnderflow { required: usize, remaining: usize },

    #[error("unexpected value kind: expected 0x{expected:02x}, found 0x{actual:02x}")]
    UnexpectedValueKind { expected: u8, actual: u8 },

    #[error("unknown custom value kind 0x{actual:02x}")]
    UnexpectedCustomValueKind { actual: u8 },

    #[error("unexpected size: expected {expected}, found {actual}")]
    UnexpectedSize { expected: usize, actual: usize },

    #[error("unknown value kind 0x{0:02x}")]
    UnknownValueKind(u8),

    #[error("unknown discriminator {0}")]
    UnknownDiscriminator(u8),

    #[error("invalid unit body 0x{0:02x} (expected 0x00)")]
    InvalidUnit(u8),

    #[error("invalid bool value 0x{0:02x} (expected 0x00 or 0x01)")]
    InvalidBool(u8),

    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    #[error("size prefix exceeds 4 bytes")]
    SizeTooLarge,

    #[error("maximum decoding depth {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error("duplicate key in set or map")]
    DuplicateKey,

    #[error("set or map keys are not in ascending order")]
    UnorderedKeys,

    #[error("invalid custom value")]
    InvalidCustomValue,
}

/// Error while building or resolving a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("type {type_name:?} references a type that was never registered")]
    UnregisteredType { type_name: Option<String> },

    #[error("schema type index {index} out of bounds (size: {len})")]
    TypeIndexOutOfBounds { index: usize, len: usize },

    #[error("unknown well-known type 0x{0:02x}")]
    UnknownWellKnownType(u8),

    #[error("metadata of type {index} names {names} children but the type has {children}")]
    ChildNameCountMismatch {
        index: usize,
        names: usize,
        children: usize,
    },

    #[error("metadata of type {index} names enum variant {discriminator} which the type does not have")]
    UnknownVariantName { index: usize, discriminator: u8 },

    #[error("schema has {kinds} type kinds but {metadata} metadata entries")]
    MetadataLengthMismatch { kinds: usize, metadata: usize },
}

/// Error while validating a payload against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadValidationError {
    #[error("malformed payload at byte {offset} ({path}): {error}")]
    DecodeError {
        error: DecodeError,
        offset: usize,
        path: String,
    },

    #[error(transparent)]
    SchemaError(#[from] SchemaError),

    #[error("value kind mismatch at byte {offset}: schema expects 0x{expected:02x}, payload has 0x{actual:02x}")]
    ValueKindMismatch { expected: u8, actual: u8, offset: usize },

    #[error("length mismatch at byte {offset}: schema expects {expected} fields, payload has {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        offset: usize,
    },

    #[error("unknown enum variant {discriminator} at byte {offset}")]
    UnknownEnumVariant { discriminator: u8, offset: usize },
}

/// Error when mutating a substate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstateError {
    #[error("substate is locked")]
    Locked,
}
