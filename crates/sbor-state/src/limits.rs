//! Bounds applied while encoding, decoding and traversing payloads.
//!
//! Payloads may come from untrusted guest code, so every reader enforces
//! these limits instead of trusting declared lengths.

/// Default maximum nesting depth. The root value sits at depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Maximum bytes in a LEB128 size prefix.
pub const MAX_SIZE_BYTES: usize = 4;

/// Largest size expressible in [`MAX_SIZE_BYTES`] LEB128 bytes.
pub const MAX_SIZE: usize = 0x0FFF_FFFF;

/// Initial capacity of encoding buffers.
pub const DEFAULT_ENCODE_CAPACITY: usize = 512;
