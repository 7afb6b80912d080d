//! Types every schema resolves without registering them.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::extension::basic::NoCustomValueKind;
use crate::model::CustomValueKind;
use crate::schema::type_id::{WellKnownTypeId, well_known_ids};
use crate::schema::type_kind::{LocalTypeIndex, TypeData, TypeKind};

/// Custom value kinds that also describe schema types.
pub trait CustomSchema: CustomValueKind {
    /// Resolves a well-known id owned by this extension.
    fn resolve_custom_well_known_type(id: WellKnownTypeId) -> Option<TypeData<Self, LocalTypeIndex>>;
}

type BasicTypeData = TypeData<NoCustomValueKind, LocalTypeIndex>;

lazy_static! {
    static ref BASIC_WELL_KNOWN_TYPES: FxHashMap<u8, BasicTypeData> = {
        let entries: [(WellKnownTypeId, &'static str, TypeKind<NoCustomValueKind, LocalTypeIndex>); 15] = [
            (well_known_ids::UNIT, "Unit", TypeKind::Unit),
            (well_known_ids::BOOL, "Bool", TypeKind::Bool),
            (well_known_ids::I8, "I8", TypeKind::I8),
            (well_known_ids::I16, "I16", TypeKind::I16),
            (well_known_ids::I32, "I32", TypeKind::I32),
            (well_known_ids::I64, "I64", TypeKind::I64),
            (well_known_ids::I128, "I128", TypeKind::I128),
            (well_known_ids::U8, "U8", TypeKind::U8),
            (well_known_ids::U16, "U16", TypeKind::U16),
            (well_known_ids::U32, "U32", TypeKind::U32),
            (well_known_ids::U64, "U64", TypeKind::U64),
            (well_known_ids::U128, "U128", TypeKind::U128),
            (well_known_ids::STRING, "String", TypeKind::String),
            (well_known_ids::ANY, "Any", TypeKind::Any),
            (
                well_known_ids::BYTES,
                "Bytes",
                TypeKind::Array {
                    element_type: LocalTypeIndex::WellKnown(well_known_ids::U8),
                },
            ),
        ];
        entries
            .into_iter()
            .map(|(id, name, kind)| (id.as_u8(), TypeData::named_no_child_names(name, kind)))
            .collect()
    };
}

/// Rewrites basic type data for any custom extension.
///
/// Basic type data never holds a custom kind, so this always succeeds.
fn with_custom_kind<X: CustomValueKind>(data: &BasicTypeData) -> TypeData<X, LocalTypeIndex> {
    let kind = match &data.kind {
        TypeKind::Any => TypeKind::Any,
        TypeKind::Unit => TypeKind::Unit,
        TypeKind::Bool => TypeKind::Bool,
        TypeKind::I8 => TypeKind::I8,
        TypeKind::I16 => TypeKind::I16,
        TypeKind::I32 => TypeKind::I32,
        TypeKind::I64 => TypeKind::I64,
        TypeKind::I128 => TypeKind::I128,
        TypeKind::U8 => TypeKind::U8,
        TypeKind::U16 => TypeKind::U16,
        TypeKind::U32 => TypeKind::U32,
        TypeKind::U64 => TypeKind::U64,
        TypeKind::U128 => TypeKind::U128,
        TypeKind::String => TypeKind::String,
        TypeKind::Array { element_type } => TypeKind::Array {
            element_type: *element_type,
        },
        TypeKind::Tuple { field_types } => TypeKind::Tuple {
            field_types: field_types.clone(),
        },
        TypeKind::Enum { variants } => TypeKind::Enum {
            variants: variants.clone(),
        },
        TypeKind::Map {
            key_type,
            value_type,
        } => TypeKind::Map {
            key_type: *key_type,
            value_type: *value_type,
        },
        TypeKind::Custom(never) => match *never {},
    };
    TypeData {
        kind,
        metadata: data.metadata.clone(),
    }
}

/// Resolves a well-known id shared by every extension.
pub fn resolve_basic_well_known_type<X: CustomValueKind>(
    id: WellKnownTypeId,
) -> Option<TypeData<X, LocalTypeIndex>> {
    BASIC_WELL_KNOWN_TYPES.get(&id.as_u8()).map(with_custom_kind)
}

/// Resolves a well-known id against the basic table, then the extension.
pub fn resolve_well_known_type<X: CustomSchema>(
    id: WellKnownTypeId,
) -> Option<TypeData<X, LocalTypeIndex>> {
    resolve_basic_well_known_type(id).or_else(|| X::resolve_custom_well_known_type(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::ledger::LedgerCustomValueKind;

    #[test]
    fn test_basic_types_resolve() {
        let bytes = resolve_basic_well_known_type::<NoCustomValueKind>(well_known_ids::BYTES).unwrap();
        assert_eq!(
            bytes.kind,
            TypeKind::Array {
                element_type: LocalTypeIndex::WellKnown(well_known_ids::U8),
            }
        );
        assert_eq!(bytes.metadata.get_name(), Some("Bytes"));
        assert!(resolve_basic_well_known_type::<NoCustomValueKind>(WellKnownTypeId::of(0x3f)).is_none());
    }

    #[test]
    fn test_custom_types_resolve_through_extension() {
        let decimal = resolve_well_known_type::<LedgerCustomValueKind>(WellKnownTypeId::of(0xa0)).unwrap();
        assert_eq!(decimal.kind, TypeKind::Custom(LedgerCustomValueKind::Decimal));
        assert!(resolve_well_known_type::<NoCustomValueKind>(WellKnownTypeId::of(0xa0)).is_none());
    }
}
