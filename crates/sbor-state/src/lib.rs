//! SBOR state: a schema-aware binary value encoding for ledger state.
//!
//! This crate provides the value encoding used for persisted state, the
//! schemas describing it, streaming traversal of untrusted payloads, and the
//! versioned substate wrappers that the storage layer reads and writes.
//!
//! # Overview
//!
//! Every encoded value starts with a one-byte value kind, followed by a
//! kind-specific body:
//! - **Deterministic**: one value has exactly one encoding
//! - **Self-describing**: payloads can be walked without the Rust type
//! - **Extensible**: kinds from 0x80 up are supplied by an extension
//!
//! # Quick Start
//!
//! ```rust
//! use sbor_state::impl_codec_for_struct;
//! use sbor_state::extension::basic::{basic_decode, basic_encode};
//!
//! #[derive(Debug, PartialEq)]
//! struct Transfer {
//!     to: String,
//!     amount: u64,
//!     memo: Option<String>,
//! }
//! impl_codec_for_struct!(Transfer { to: String, amount: u64, memo: Option<String> });
//!
//! let transfer = Transfer {
//!     to: "alice".to_string(),
//!     amount: 10,
//!     memo: None,
//! };
//!
//! // Encode to binary
//! let bytes = basic_encode(&transfer).unwrap();
//!
//! // Decode back
//! let decoded: Transfer = basic_decode(&bytes).unwrap();
//! assert_eq!(transfer, decoded);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Value kinds and the dynamic value tree
//! - [`codec`]: Encoder, decoder and impls for std types
//! - [`extension`]: Custom value kinds (`basic`, `ledger`)
//! - [`schema`]: Type descriptions and schema generation
//! - [`traversal`]: Event-based payload traversal
//! - [`validate`]: Payload validation against a schema
//! - [`versioning`]: Versioned content types
//! - [`substate`]: Persisted substate wrappers
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and default bounds
//!
//! # Security
//!
//! Decoding and traversal are designed to safely handle untrusted input:
//! - Nesting is bounded by `max_depth` (default 64) on both sides
//! - Sizes are limited to four LEB128 bytes
//! - Declared lengths never drive allocation past the remaining input
//! - Trailing bytes are rejected unless explicitly allowed

pub mod codec;
pub mod error;
pub mod extension;
pub mod limits;
mod macros;
pub mod model;
pub mod schema;
pub mod substate;
pub mod traversal;
pub mod validate;
pub mod versioning;

// Re-export commonly used types at crate root
pub use codec::{CodecOptions, Decode, Decoder, Encode, Encoder, decode, decode_with_options, encode, encode_with_options};
pub use error::{DecodeError, EncodeError, PayloadValidationError, SchemaError, SubstateError};
pub use model::{Categorize, CustomValue, CustomValueKind, SborEnum, SborTuple, Value, ValueKind};
pub use schema::{
    CustomSchema, Describe, LocalTypeIndex, RustTypeId, Schema, TypeAggregator,
    generate_full_schema_from_single_type,
};
pub use traversal::{ExpectedStart, TraversalEvent, VecTraverser, traverse};
pub use validate::validate_payload_against_schema;
pub use versioning::{IntoVersioned, Versioned};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
