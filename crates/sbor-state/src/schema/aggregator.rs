//! Collects the transitive closure of a type's schema.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::error::SchemaError;
use crate::schema::describe::Describe;
use crate::schema::definition::Schema;
use crate::schema::type_id::RustTypeId;
use crate::schema::type_kind::{LocalTypeIndex, TypeData, TypeMetadata};
use crate::schema::well_known::CustomSchema;

/// Deduplicating collector of type data, keyed by [`RustTypeId`].
///
/// Registration (`add_child_type`) and walking (`add_schema_descendents`) are
/// tracked separately: a type is registered the first time it is reached and
/// walked at most once, so recursive types terminate.
///
/// An aggregator belongs to a single schema-collection pass. Concurrent
/// passes use their own aggregators.
#[derive(Debug)]
pub struct TypeAggregator<X: CustomSchema> {
    type_indices: FxHashMap<RustTypeId, usize>,
    types: Vec<TypeData<X, RustTypeId>>,
    already_walked: FxHashSet<RustTypeId>,
}

impl<X: CustomSchema> Default for TypeAggregator<X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: CustomSchema> TypeAggregator<X> {
    pub fn new() -> Self {
        Self {
            type_indices: FxHashMap::default(),
            types: Vec::new(),
            already_walked: FxHashSet::default(),
        }
    }

    /// Registers `T` and everything it references.
    pub fn add_child_type_and_descendents<T: Describe<X> + ?Sized>(&mut self) -> LocalTypeIndex {
        let index = self.add_child_type(T::type_id(), T::type_data);
        self.add_schema_descendents::<T>();
        index
    }

    /// Registers a type without walking its dependencies.
    ///
    /// Well-known types are never stored. `get_type_data` is only called the
    /// first time a novel id is seen.
    pub fn add_child_type(
        &mut self,
        type_id: RustTypeId,
        get_type_data: impl FnOnce() -> TypeData<X, RustTypeId>,
    ) -> LocalTypeIndex {
        match type_id {
            RustTypeId::WellKnown(id) => LocalTypeIndex::WellKnown(id),
            RustTypeId::Novel(_) => {
                if let Some(index) = self.type_indices.get(&type_id) {
                    return LocalTypeIndex::SchemaLocalIndex(*index);
                }
                let type_data = get_type_data();
                let index = self.types.len();
                trace!(
                    index,
                    type_name = type_data.metadata.get_name().unwrap_or("<unnamed>"),
                    "registered schema type"
                );
                self.types.push(type_data);
                self.type_indices.insert(type_id, index);
                LocalTypeIndex::SchemaLocalIndex(index)
            }
        }
    }

    /// Walks the dependencies of `T` unless it was walked before.
    ///
    /// Returns whether a walk happened.
    pub fn add_schema_descendents<T: Describe<X> + ?Sized>(&mut self) -> bool {
        let type_id = T::type_id();
        if type_id.is_well_known() || !self.already_walked.insert(type_id) {
            return false;
        }
        T::add_all_dependencies(self);
        true
    }

    /// Number of registered novel types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves child ids to local indices and builds the schema.
    ///
    /// Fails if a registered type references a novel type that was never
    /// registered, which means a `Describe` impl forgot a dependency.
    pub fn generate_schema(self) -> Result<Schema<X>, SchemaError> {
        let type_indices = self.type_indices;
        let mut type_kinds = Vec::with_capacity(self.types.len());
        let mut type_metadata: Vec<TypeMetadata> = Vec::with_capacity(self.types.len());

        for type_data in self.types {
            let type_name = type_data.metadata.type_name.as_ref().map(|name| name.to_string());
            let resolved = type_data.try_map_children(|child| match child {
                RustTypeId::WellKnown(id) => Ok(LocalTypeIndex::WellKnown(id)),
                RustTypeId::Novel(_) => type_indices
                    .get(&child)
                    .map(|index| LocalTypeIndex::SchemaLocalIndex(*index))
                    .ok_or_else(|| SchemaError::UnregisteredType {
                        type_name: type_name.clone(),
                    }),
            })?;
            type_kinds.push(resolved.kind);
            type_metadata.push(resolved.metadata);
        }

        Ok(Schema {
            type_kinds,
            type_metadata,
        })
    }
}

/// Generates a schema holding `T` and every type it references.
///
/// Returns the index of `T` alongside the schema. Well-known types resolve to
/// a well-known index and need no schema entry.
pub fn generate_full_schema_from_single_type<T: Describe<X> + ?Sized, X: CustomSchema>()
-> Result<(LocalTypeIndex, Schema<X>), SchemaError> {
    let mut aggregator = TypeAggregator::<X>::new();
    let type_index = aggregator.add_child_type_and_descendents::<T>();
    let schema = aggregator.generate_schema()?;
    schema.validate()?;
    Ok((type_index, schema))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::extension::basic::NoCustomValueKind;
    use crate::schema::type_kind::TypeKind;
    use crate::schema::type_id::{novel_type_id, well_known_ids};

    type X = NoCustomValueKind;

    struct Point;

    impl Describe<X> for Point {
        fn type_id() -> RustTypeId {
            novel_type_id("Point", &[])
        }

        fn type_data() -> TypeData<X, RustTypeId> {
            TypeData::struct_with_named_fields(
                "Point",
                vec![("x", well_known_ids::I32.into()), ("y", well_known_ids::I32.into())],
            )
        }
    }

    /// References `Point` through two independent fields.
    struct Segment;

    impl Describe<X> for Segment {
        fn type_id() -> RustTypeId {
            novel_type_id("Segment", &[])
        }

        fn type_data() -> TypeData<X, RustTypeId> {
            TypeData::struct_with_named_fields(
                "Segment",
                vec![("start", Point::type_id()), ("end", Point::type_id())],
            )
        }

        fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
            aggregator.add_child_type_and_descendents::<Point>();
            aggregator.add_child_type_and_descendents::<Point>();
        }
    }

    /// A linked list: refers to itself through `Option<Box<Chain>>`.
    struct Chain;

    impl Describe<X> for Chain {
        fn type_id() -> RustTypeId {
            novel_type_id("Chain", &[])
        }

        fn type_data() -> TypeData<X, RustTypeId> {
            TypeData::struct_with_named_fields(
                "Chain",
                vec![
                    ("value", well_known_ids::U8.into()),
                    ("next", <Option<Box<Chain>> as Describe<X>>::type_id()),
                ],
            )
        }

        fn add_all_dependencies(aggregator: &mut TypeAggregator<X>) {
            aggregator.add_child_type_and_descendents::<Option<Box<Chain>>>();
        }
    }

    #[test]
    fn test_shared_dependency_registered_once() {
        let (index, schema) = generate_full_schema_from_single_type::<Segment, X>().unwrap();
        assert_eq!(index, LocalTypeIndex::SchemaLocalIndex(0));
        assert_eq!(schema.type_kinds.len(), 2);
        assert_eq!(
            schema.type_kinds[0],
            TypeKind::Tuple {
                field_types: vec![
                    LocalTypeIndex::SchemaLocalIndex(1),
                    LocalTypeIndex::SchemaLocalIndex(1),
                ],
            }
        );
        assert_eq!(schema.type_metadata[1].get_name(), Some("Point"));
    }

    #[test]
    fn test_recursive_type_terminates() {
        let (index, schema) = generate_full_schema_from_single_type::<Chain, X>().unwrap();
        assert_eq!(index, LocalTypeIndex::SchemaLocalIndex(0));
        // Chain and Option<Box<Chain>>; Box is transparent
        assert_eq!(schema.type_kinds.len(), 2);
        let mut variants: BTreeMap<u8, Vec<LocalTypeIndex>> = BTreeMap::new();
        variants.insert(0, vec![]);
        variants.insert(1, vec![LocalTypeIndex::SchemaLocalIndex(0)]);
        assert_eq!(
            schema.type_kinds[1],
            TypeKind::<X, LocalTypeIndex>::Enum { variants }
        );
    }

    #[test]
    fn test_describe_is_idempotent() {
        let (_, first) = generate_full_schema_from_single_type::<Segment, X>().unwrap();
        let (_, second) = generate_full_schema_from_single_type::<Segment, X>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_well_known_root_needs_no_entries() {
        let (index, schema) = generate_full_schema_from_single_type::<u64, X>().unwrap();
        assert_eq!(index, LocalTypeIndex::WellKnown(well_known_ids::U64));
        assert!(schema.type_kinds.is_empty());
    }

    #[test]
    fn test_missing_dependency_reported() {
        struct Forgetful;

        impl Describe<X> for Forgetful {
            fn type_id() -> RustTypeId {
                novel_type_id("Forgetful", &[])
            }

            fn type_data() -> TypeData<X, RustTypeId> {
                TypeData::named_no_child_names(
                    "Forgetful",
                    TypeKind::Array {
                        element_type: Point::type_id(),
                    },
                )
            }
        }

        assert_eq!(
            generate_full_schema_from_single_type::<Forgetful, X>(),
            Err(SchemaError::UnregisteredType {
                type_name: Some("Forgetful".to_string()),
            })
        );
    }
}
