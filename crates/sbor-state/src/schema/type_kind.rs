//! Type-level descriptions: kinds, names and child references.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::model::{CustomValueKind, ValueKind};
use crate::schema::type_id::WellKnownTypeId;

/// A reference to a type inside a generated schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocalTypeIndex {
    WellKnown(WellKnownTypeId),
    SchemaLocalIndex(usize),
}

/// The structure of a type. `L` is how children are referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind<X: CustomValueKind, L> {
    Any,
    Unit,
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    String,
    Array { element_type: L },
    Tuple { field_types: Vec<L> },
    Enum { variants: BTreeMap<u8, Vec<L>> },
    Map { key_type: L, value_type: L },
    Custom(X),
}

impl<X: CustomValueKind, L> TypeKind<X, L> {
    /// The value kind a matching payload starts with, or `None` for `Any`.
    pub fn value_kind(&self) -> Option<ValueKind<X>> {
        let value_kind = match self {
            TypeKind::Any => return None,
            TypeKind::Unit => ValueKind::Unit,
            TypeKind::Bool => ValueKind::Bool,
            TypeKind::I8 => ValueKind::I8,
            TypeKind::I16 => ValueKind::I16,
            TypeKind::I32 => ValueKind::I32,
            TypeKind::I64 => ValueKind::I64,
            TypeKind::I128 => ValueKind::I128,
            TypeKind::U8 => ValueKind::U8,
            TypeKind::U16 => ValueKind::U16,
            TypeKind::U32 => ValueKind::U32,
            TypeKind::U64 => ValueKind::U64,
            TypeKind::U128 => ValueKind::U128,
            TypeKind::String => ValueKind::String,
            TypeKind::Array { .. } => ValueKind::Array,
            TypeKind::Tuple { .. } => ValueKind::Tuple,
            TypeKind::Enum { .. } => ValueKind::Enum,
            TypeKind::Map { .. } => ValueKind::Map,
            TypeKind::Custom(custom) => ValueKind::Custom(*custom),
        };
        Some(value_kind)
    }

    /// Visits every child reference.
    pub fn children(&self) -> Vec<&L> {
        match self {
            TypeKind::Array { element_type } => vec![element_type],
            TypeKind::Tuple { field_types } => field_types.iter().collect(),
            TypeKind::Enum { variants } => variants.values().flatten().collect(),
            TypeKind::Map {
                key_type,
                value_type,
            } => vec![key_type, value_type],
            _ => Vec::new(),
        }
    }

    /// Rewrites every child reference, failing on the first error.
    pub fn try_map_children<L2, E>(
        self,
        mut f: impl FnMut(L) -> Result<L2, E>,
    ) -> Result<TypeKind<X, L2>, E> {
        let kind = match self {
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
                element_type: f(element_type)?,
            },
            TypeKind::Tuple { field_types } => TypeKind::Tuple {
                field_types: field_types.into_iter().map(&mut f).collect::<Result<_, _>>()?,
            },
            TypeKind::Enum { variants } => {
                let mut mapped = BTreeMap::new();
                for (discriminator, fields) in variants {
                    let fields = fields.into_iter().map(&mut f).collect::<Result<_, _>>()?;
                    mapped.insert(discriminator, fields);
                }
                TypeKind::Enum { variants: mapped }
            }
            TypeKind::Map {
                key_type,
                value_type,
            } => TypeKind::Map {
                key_type: f(key_type)?,
                value_type: f(value_type)?,
            },
            TypeKind::Custom(custom) => TypeKind::Custom(custom),
        };
        Ok(kind)
    }
}

/// Names attached to a type's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildNames {
    NamedFields(Vec<Cow<'static, str>>),
    EnumVariants(BTreeMap<u8, TypeMetadata>),
}

/// Human-readable names for a type. Never affects encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMetadata {
    pub type_name: Option<Cow<'static, str>>,
    pub child_names: Option<ChildNames>,
}

impl TypeMetadata {
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn no_child_names(name: &'static str) -> Self {
        Self {
            type_name: Some(Cow::Borrowed(name)),
            child_names: None,
        }
    }

    pub fn named_fields(name: &'static str, field_names: &[&'static str]) -> Self {
        Self {
            type_name: Some(Cow::Borrowed(name)),
            child_names: Some(ChildNames::NamedFields(
                field_names.iter().map(|name| Cow::Borrowed(*name)).collect(),
            )),
        }
    }

    pub fn get_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the name of field `index`, if fields are named.
    pub fn get_field_name(&self, index: usize) -> Option<&str> {
        match &self.child_names {
            Some(ChildNames::NamedFields(names)) => names.get(index).map(|name| name.as_ref()),
            _ => None,
        }
    }

    /// Returns the metadata of enum variant `discriminator`.
    pub fn get_variant(&self, discriminator: u8) -> Option<&TypeMetadata> {
        match &self.child_names {
            Some(ChildNames::EnumVariants(variants)) => variants.get(&discriminator),
            _ => None,
        }
    }
}

/// A type's kind together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeData<X: CustomValueKind, L> {
    pub kind: TypeKind<X, L>,
    pub metadata: TypeMetadata,
}

impl<X: CustomValueKind, L> TypeData<X, L> {
    pub fn unnamed(kind: TypeKind<X, L>) -> Self {
        Self {
            kind,
            metadata: TypeMetadata::unnamed(),
        }
    }

    pub fn named_no_child_names(name: &'static str, kind: TypeKind<X, L>) -> Self {
        Self {
            kind,
            metadata: TypeMetadata::no_child_names(name),
        }
    }

    /// A struct with named fields, in declaration order.
    pub fn struct_with_named_fields(name: &'static str, fields: Vec<(&'static str, L)>) -> Self {
        let (field_names, field_types): (Vec<_>, Vec<_>) = fields.into_iter().unzip();
        Self {
            kind: TypeKind::Tuple { field_types },
            metadata: TypeMetadata::named_fields(name, &field_names),
        }
    }

    /// An enum whose variants carry positional fields.
    pub fn enum_variants(name: &'static str, variants: BTreeMap<u8, (&'static str, Vec<L>)>) -> Self {
        let mut variant_types = BTreeMap::new();
        let mut variant_metadata = BTreeMap::new();
        for (discriminator, (variant_name, field_types)) in variants {
            variant_types.insert(discriminator, field_types);
            variant_metadata.insert(discriminator, TypeMetadata::no_child_names(variant_name));
        }
        Self {
            kind: TypeKind::Enum {
                variants: variant_types,
            },
            metadata: TypeMetadata {
                type_name: Some(Cow::Borrowed(name)),
                child_names: Some(ChildNames::EnumVariants(variant_metadata)),
            },
        }
    }

    pub fn try_map_children<L2, E>(
        self,
        f: impl FnMut(L) -> Result<L2, E>,
    ) -> Result<TypeData<X, L2>, E> {
        Ok(TypeData {
            kind: self.kind.try_map_children(f)?,
            metadata: self.metadata,
        })
    }
}
