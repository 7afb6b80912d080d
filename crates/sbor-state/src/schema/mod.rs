//! Schema description.
//!
//! Schemas describe types, not values. They are generated from [`Describe`]
//! impls through a [`TypeAggregator`] and used for off-line validation and
//! tooling; encoding never consults them.

pub mod aggregator;
pub mod definition;
pub mod describe;
pub mod type_id;
pub mod type_kind;
pub mod well_known;

pub use aggregator::{TypeAggregator, generate_full_schema_from_single_type};
pub use definition::Schema;
pub use describe::Describe;
pub use type_id::{RustTypeId, TypeHash, WellKnownTypeId, novel_type_id, well_known_ids};
pub use type_kind::{ChildNames, LocalTypeIndex, TypeData, TypeKind, TypeMetadata};
pub use well_known::{CustomSchema, resolve_basic_well_known_type, resolve_well_known_type};
