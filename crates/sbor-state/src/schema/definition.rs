//! Generated schemas.

use std::borrow::Cow;

use crate::error::SchemaError;
use crate::schema::type_kind::{ChildNames, LocalTypeIndex, TypeKind, TypeMetadata};
use crate::schema::well_known::{CustomSchema, resolve_well_known_type};

/// The flattened result of a type aggregation.
///
/// `type_kinds[i]` and `type_metadata[i]` describe the type at
/// [`LocalTypeIndex::SchemaLocalIndex(i)`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema<X: CustomSchema> {
    pub type_kinds: Vec<TypeKind<X, LocalTypeIndex>>,
    pub type_metadata: Vec<TypeMetadata>,
}

impl<X: CustomSchema> Default for Schema<X> {
    fn default() -> Self {
        Self {
            type_kinds: Vec::new(),
            type_metadata: Vec::new(),
        }
    }
}

impl<X: CustomSchema> Schema<X> {
    /// Resolves the kind of a type, well-known or local.
    pub fn resolve_type_kind(
        &self,
        index: LocalTypeIndex,
    ) -> Result<Cow<'_, TypeKind<X, LocalTypeIndex>>, SchemaError> {
        match index {
            LocalTypeIndex::WellKnown(id) => resolve_well_known_type::<X>(id)
                .map(|data| Cow::Owned(data.kind))
                .ok_or(SchemaError::UnknownWellKnownType(id.as_u8())),
            LocalTypeIndex::SchemaLocalIndex(i) => self
                .type_kinds
                .get(i)
                .map(Cow::Borrowed)
                .ok_or(SchemaError::TypeIndexOutOfBounds {
                    index: i,
                    len: self.type_kinds.len(),
                }),
        }
    }

    /// Resolves the metadata of a type, well-known or local.
    pub fn resolve_type_metadata(
        &self,
        index: LocalTypeIndex,
    ) -> Result<Cow<'_, TypeMetadata>, SchemaError> {
        match index {
            LocalTypeIndex::WellKnown(id) => resolve_well_known_type::<X>(id)
                .map(|data| Cow::Owned(data.metadata))
                .ok_or(SchemaError::UnknownWellKnownType(id.as_u8())),
            LocalTypeIndex::SchemaLocalIndex(i) => self
                .type_metadata
                .get(i)
                .map(Cow::Borrowed)
                .ok_or(SchemaError::TypeIndexOutOfBounds {
                    index: i,
                    len: self.type_metadata.len(),
                }),
        }
    }

    /// Returns the type name at `index`, if it has one.
    pub fn type_name(&self, index: LocalTypeIndex) -> Option<String> {
        self.resolve_type_metadata(index)
            .ok()
            .and_then(|metadata| metadata.get_name().map(str::to_string))
    }

    /// Checks that every reference resolves and names line up with children.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.type_kinds.len() != self.type_metadata.len() {
            return Err(SchemaError::MetadataLengthMismatch {
                kinds: self.type_kinds.len(),
                metadata: self.type_metadata.len(),
            });
        }

        for (index, (kind, metadata)) in self.type_kinds.iter().zip(&self.type_metadata).enumerate() {
            for child in kind.children() {
                self.resolve_type_kind(*child)?;
            }
            validate_child_names(index, kind, metadata)?;
        }
        Ok(())
    }
}

fn validate_child_names<X: CustomSchema>(
    index: usize,
    kind: &TypeKind<X, LocalTypeIndex>,
    metadata: &TypeMetadata,
) -> Result<(), SchemaError> {
    match (&metadata.child_names, kind) {
        (None, _) => Ok(()),
        (Some(ChildNames::NamedFields(names)), TypeKind::Tuple { field_types }) => {
            check_count(index, names.len(), field_types.len())
        }
        (Some(ChildNames::EnumVariants(variant_names)), TypeKind::Enum { variants }) => {
            check_count(index, variant_names.len(), variants.len())?;
            for (discriminator, variant) in variant_names {
                let fields = variants.get(discriminator).ok_or(SchemaError::UnknownVariantName {
                    index,
                    discriminator: *discriminator,
                })?;
                if let Some(ChildNames::NamedFields(names)) = &variant.child_names {
                    check_count(index, names.len(), fields.len())?;
                }
            }
            Ok(())
        }
        (Some(ChildNames::NamedFields(names)), _) => check_count(index, names.len(), kind.children().len()),
        (Some(ChildNames::EnumVariants(variant_names)), _) => check_count(index, variant_names.len(), 0),
    }
}

fn check_count(index: usize, names: usize, children: usize) -> Result<(), SchemaError> {
    if names == children {
        Ok(())
    } else {
        Err(SchemaError::ChildNameCountMismatch {
            index,
            names,
            children,
        })
    }
}
