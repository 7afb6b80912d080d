//! Stable identifiers for described Rust types.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::model::{
    VALUE_KIND_BOOL, VALUE_KIND_I8, VALUE_KIND_I16, VALUE_KIND_I32, VALUE_KIND_I64,
    VALUE_KIND_I128, VALUE_KIND_STRING, VALUE_KIND_U8, VALUE_KIND_U16, VALUE_KIND_U32,
    VALUE_KIND_U64, VALUE_KIND_U128, VALUE_KIND_UNIT,
};

/// Length of a novel type hash in bytes.
pub const TYPE_HASH_LENGTH: usize = 20;

/// Truncated SHA-256 identifying a novel type.
pub type TypeHash = [u8; TYPE_HASH_LENGTH];

/// A type every schema knows without registering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellKnownTypeId(u8);

impl WellKnownTypeId {
    pub const fn of(id: u8) -> Self {
        Self(id)
    }

    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for WellKnownTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "well-known 0x{:02x}", self.0)
    }
}

/// Well-known type ids.
///
/// Scalars reuse their value kind tags. Custom extensions add their own ids
/// from `0x80` up, matching their custom value kinds.
pub mod well_known_ids {
    use super::*;

    pub const UNIT: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_UNIT);
    pub const BOOL: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_BOOL);
    pub const I8: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_I8);
    pub const I16: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_I16);
    pub const I32: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_I32);
    pub const I64: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_I64);
    pub const I128: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_I128);
    pub const U8: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_U8);
    pub const U16: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_U16);
    pub const U32: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_U32);
    pub const U64: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_U64);
    pub const U128: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_U128);
    pub const STRING: WellKnownTypeId = WellKnownTypeId::of(VALUE_KIND_STRING);

    /// Matches any value.
    pub const ANY: WellKnownTypeId = WellKnownTypeId::of(0x40);
    /// `Vec<u8>` and friends.
    pub const BYTES: WellKnownTypeId = WellKnownTypeId::of(0x41);
}

/// Identifies a Rust type within a type aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RustTypeId {
    WellKnown(WellKnownTypeId),
    Novel(TypeHash),
}

impl RustTypeId {
    pub fn is_well_known(&self) -> bool {
        matches!(self, RustTypeId::WellKnown(_))
    }
}

impl From<WellKnownTypeId> for RustTypeId {
    fn from(id: WellKnownTypeId) -> Self {
        RustTypeId::WellKnown(id)
    }
}

/// Derives the id of a novel type from its name and the ids of its
/// generic parameters.
///
/// ```text
/// id = SHA-256(name || 0x00 || for each dependency: tag || id bytes)[0..20]
/// ```
pub fn novel_type_id(name: &str, dependencies: &[RustTypeId]) -> RustTypeId {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    for dependency in dependencies {
        match dependency {
            RustTypeId::WellKnown(id) => {
                hasher.update([0u8, id.as_u8()]);
            }
            RustTypeId::Novel(hash) => {
                hasher.update([1u8]);
                hasher.update(hash);
            }
        }
    }
    let hash = hasher.finalize();

    let mut id = [0u8; TYPE_HASH_LENGTH];
    id.copy_from_slice(&hash[..TYPE_HASH_LENGTH]);
    RustTypeId::Novel(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_novel_type_id_deterministic() {
        let a = novel_type_id("Vault", &[well_known_ids::U64.into()]);
        let b = novel_type_id("Vault", &[well_known_ids::U64.into()]);
        assert_eq!(a, b);
        assert!(!a.is_well_known());
    }

    #[test]
    fn test_novel_type_id_depends_on_parameters() {
        let of_u8 = novel_type_id("Array", &[well_known_ids::U8.into()]);
        let of_u16 = novel_type_id("Array", &[well_known_ids::U16.into()]);
        let bare = novel_type_id("Array", &[]);
        assert_ne!(of_u8, of_u16);
        assert_ne!(of_u8, bare);
    }
}
