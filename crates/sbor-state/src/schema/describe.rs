//! The `Describe` trait and its impls for standard library types.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CustomValue, Value};
use crate::schema::aggregator::TypeAggregator;
use crate::schema::type_id::{RustTypeId, novel_type_id, well_known_ids};
use crate::schema::type_kind::{TypeData, TypeKind};
use crate::schema::well_known::CustomSchema;

/// A type with a schema description.
///
/// Describing is pure: `type_id` and `type_data` return the same thing on
/// every call, so aggregation is deterministic.
pub trait Describe<X: CustomSchema> {
    /// Stable id, used to deduplicate and to reference this type.
    fn type_id() -> RustTypeId;

    /// This type's own kind and metadata. Children are referenced by id.
    fn type_data() -> TypeData<X, RustTypeId>;

    /// Registers every type referenced from `type_data`.
    ///
    /// Implementations call [`TypeAggregator::add_child_type_and_descendents`]
    /// once per child type. Types without novel children keep the default.
    fn add_all_dependencies(_aggregator: &mut TypeAggregator<X>) {}
}

macro_rules! describe_well_known {
    ($type:ty, $id:ident, $kind:ident) => {
        impl<X: CustomSchema> Describe<X> for $type {
            fn type_id() -> RustTypeId {
                RustTypeId::WellKnown(well_known_ids::$id)
            }

            fn type_data() -> TypeData<X, RustTypeId> {
                TypeData::unnamed(TypeKind::$kind)
            }
        }
    };
}

describe_well_known!((), UNIT, Unit);
describe_well_known!(bool, BOOL, Bool);
describe_well_known!(i8, I8, I8);
describe_well_known!(i16, I16, I16);
describe_well_known!(i32, I32, I32);
describe_well_known!(i64, I64, I64);
describe_well_known!(i128, I128, I128);
describe_well_known!(u8, U8, U8);
describe_well_known!(u16, U16, U16);
describe_well_known!(u32, U32, U32);
describe_well_known!(u64, U64, U64);
describe_well_known!(u128, U128, U128);
describe_well_known!(str, STRING, String);
describe_well_known!(String, STRING, String);

impl<X: CustomSchema, Y: CustomValue<X>> Describe<X> for Value<X, Y> {
    fn type_id() -> RustTypeId {
        RustTypeId::WellKnown(well_known_ids::ANY)
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        TypeData::unnamed(TypeKind::Any)
    }
}

// Pointers describe as their pointee.

impl<X: CustomSchema, T: Describe<X> + ?Sized> Describe<X> for &T {
    fn type_id() -> RustTypeId {
        T::type_id()
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        T::type_data()
    }

    fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
        T::add_all_dependencies(aggregator)
    }
}

impl<X: CustomSchema, T: Describe<X> + ?Sized> Describe<X> for Box<T> {
    fn type_id() -> RustTypeId {
        T::type_id()
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        T::type_data()
    }

    fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
        T::add_all_dependencies(aggregator)
    }
}

// All array-encoded collections share one description per element type.

fn array_type_id<X: CustomSchema, T: Describe<X> + ?Sized>() -> RustTypeId {
    match T::type_id() {
        RustTypeId::WellKnown(well_known_ids::U8) => RustTypeId::WellKnown(well_known_ids::BYTES),
        element => novel_type_id("Array", &[element]),
    }
}

fn array_type_data<X: CustomSchema, T: Describe<X> + ?Sized>() -> TypeData<X, RustTypeId> {
    TypeData::unnamed(TypeKind::Array {
        element_type: T::type_id(),
    })
}

macro_rules! describe_array {
    () => {
        fn type_id() -> RustTypeId {
            array_type_id::<X, T>()
        }

        fn type_data() -> TypeData<X, RustTypeId> {
            array_type_data::<X, T>()
        }

        fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
            aggregator.add_child_type_and_descendents::<T>();
        }
    };
}

impl<X: CustomSchema, T: Describe<X>> Describe<X> for [T] {
    describe_array!();
}

impl<X: CustomSchema, T: Describe<X>> Describe<X> for Vec<T> {
    describe_array!();
}

impl<X: CustomSchema, T: Describe<X>, const N: usize> Describe<X> for [T; N] {
    describe_array!();
}

impl<X: CustomSchema, T: Describe<X>> Describe<X> for BTreeSet<T> {
    describe_array!();
}

impl<X: CustomSchema, K: Describe<X>, V: Describe<X>> Describe<X> for BTreeMap<K, V> {
    fn type_id() -> RustTypeId {
        novel_type_id("Map", &[K::type_id(), V::type_id()])
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        TypeData::unnamed(TypeKind::Map {
            key_type: K::type_id(),
            value_type: V::type_id(),
        })
    }

    fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
        aggregator.add_child_type_and_descendents::<K>();
        aggregator.add_child_type_and_descendents::<V>();
    }
}

impl<X: CustomSchema, T: Describe<X>> Describe<X> for Option<T> {
    fn type_id() -> RustTypeId {
        novel_type_id("Option", &[T::type_id()])
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        let mut variants = BTreeMap::new();
        variants.insert(0, ("None", vec![]));
        variants.insert(1, ("Some", vec![T::type_id()]));
        TypeData::enum_variants("Option", variants)
    }

    fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
        aggregator.add_child_type_and_descendents::<T>();
    }
}

impl<X: CustomSchema, T: Describe<X>, E: Describe<X>> Describe<X> for Result<T, E> {
    fn type_id() -> RustTypeId {
        novel_type_id("Result", &[T::type_id(), E::type_id()])
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        let mut variants = BTreeMap::new();
        variants.insert(0, ("Ok", vec![T::type_id()]));
        variants.insert(1, ("Err", vec![E::type_id()]));
        TypeData::enum_variants("Result", variants)
    }

    fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
        aggregator.add_child_type_and_descendents::<T>();
        aggregator.add_child_type_and_descendents::<E>();
    }
}

macro_rules! describe_tuple {
    ($($name:ident)+) => {
        impl<X: CustomSchema, $($name: Describe<X>),+> Describe<X> for ($($name,)+) {
            fn type_id() -> RustTypeId {
                novel_type_id("Tuple", &[$($name::type_id()),+])
            }

            fn type_data() -> TypeData<X, RustTypeId> {
                TypeData::unnamed(TypeKind::Tuple {
                    field_types: vec![$($name::type_id()),+],
                })
            }

            fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
                $(aggregator.add_child_type_and_descendents::<$name>();)+
            }
        }
    };
}

describe_tuple!(A);
describe_tuple!(A B);
describe_tuple!(A B C);
describe_tuple!(A B C D);
describe_tuple!(A B C D E);
describe_tuple!(A B C D E F);
describe_tuple!(A B C D E F G);
describe_tuple!(A B C D E F G H);
describe_tuple!(A B C D E F G H I);
describe_tuple!(A B C D E F G H I J);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::basic::NoCustomValueKind;
    use crate::schema::aggregator::generate_full_schema_from_single_type;
    use crate::schema::type_kind::LocalTypeIndex;

    type X = NoCustomValueKind;

    #[test]
    fn test_byte_collections_are_well_known() {
        assert_eq!(
            <Vec<u8> as Describe<X>>::type_id(),
            RustTypeId::WellKnown(well_known_ids::BYTES)
        );
        assert_eq!(
            <[u8; 32] as Describe<X>>::type_id(),
            RustTypeId::WellKnown(well_known_ids::BYTES)
        );
        assert_ne!(
            <Vec<u16> as Describe<X>>::type_id(),
            <Vec<u32> as Describe<X>>::type_id()
        );
    }

    #[test]
    fn test_pointers_are_transparent() {
        assert_eq!(
            <Box<Option<u8>> as Describe<X>>::type_id(),
            <Option<u8> as Describe<X>>::type_id()
        );
        assert_eq!(<&str as Describe<X>>::type_id(), <String as Describe<X>>::type_id());
    }

    #[test]
    fn test_nested_generic_schema() {
        let (index, schema) =
            generate_full_schema_from_single_type::<BTreeMap<String, Vec<(u8, bool)>>, X>().unwrap();
        assert_eq!(index, LocalTypeIndex::SchemaLocalIndex(0));
        // Map, Array of tuples, the tuple
        assert_eq!(schema.type_kinds.len(), 3);
        assert_eq!(
            schema.type_kinds[0],
            TypeKind::Map {
                key_type: LocalTypeIndex::WellKnown(well_known_ids::STRING),
                value_type: LocalTypeIndex::SchemaLocalIndex(1),
            }
        );
        assert_eq!(
            schema.type_kinds[2],
            TypeKind::Tuple {
                field_types: vec![
                    LocalTypeIndex::WellKnown(well_known_ids::U8),
                    LocalTypeIndex::WellKnown(well_known_ids::BOOL),
                ],
            }
        );
    }
}
