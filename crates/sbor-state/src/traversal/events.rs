//! Events produced by the traverser, and where they happened.

use std::fmt;

use crate::error::DecodeError;
use crate::model::{CustomValueKind, ValueKind};

/// What the traverser expects at the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStart<X: CustomValueKind> {
    /// A full value: kind byte, then body.
    Value,
    /// A body whose kind the caller already knows.
    ValueBody(ValueKind<X>),
}

/// Header of a container, as read from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerHeader<X: CustomValueKind> {
    Tuple {
        length: usize,
    },
    EnumVariant {
        discriminator: u8,
        length: usize,
    },
    Array {
        element_value_kind: ValueKind<X>,
        length: usize,
    },
    Map {
        key_value_kind: ValueKind<X>,
        value_value_kind: ValueKind<X>,
        length: usize,
    },
}

impl<X: CustomValueKind> ContainerHeader<X> {
    pub fn value_kind(&self) -> ValueKind<X> {
        match self {
            ContainerHeader::Tuple { .. } => ValueKind::Tuple,
            ContainerHeader::EnumVariant { .. } => ValueKind::Enum,
            ContainerHeader::Array { .. } => ValueKind::Array,
            ContainerHeader::Map { .. } => ValueKind::Map,
        }
    }

    /// Number of child values. A map entry counts as two.
    pub fn child_count(&self) -> usize {
        match self {
            ContainerHeader::Tuple { length }
            | ContainerHeader::EnumVariant { length, .. }
            | ContainerHeader::Array { length, .. } => *length,
            ContainerHeader::Map { length, .. } => length.saturating_mul(2),
        }
    }

    /// The kind of child `index` when the header fixes it, so the child
    /// carries no kind byte of its own.
    pub fn implicit_child_value_kind(&self, index: usize) -> Option<ValueKind<X>> {
        match self {
            ContainerHeader::Tuple { .. } | ContainerHeader::EnumVariant { .. } => None,
            ContainerHeader::Array {
                element_value_kind, ..
            } => Some(*element_value_kind),
            ContainerHeader::Map {
                key_value_kind,
                value_value_kind,
                ..
            } => {
                if index % 2 == 0 {
                    Some(*key_value_kind)
                } else {
                    Some(*value_value_kind)
                }
            }
        }
    }
}

/// A scalar value, borrowing from the payload where possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalValueRef<'de, X: CustomValueKind> {
    Unit,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    String(&'de str),
    Custom { value_kind: X, body: &'de [u8] },
}

impl<X: CustomValueKind> TerminalValueRef<'_, X> {
    pub fn value_kind(&self) -> ValueKind<X> {
        match self {
            TerminalValueRef::Unit => ValueKind::Unit,
            TerminalValueRef::Bool(_) => ValueKind::Bool,
            TerminalValueRef::I8(_) => ValueKind::I8,
            TerminalValueRef::I16(_) => ValueKind::I16,
            TerminalValueRef::I32(_) => ValueKind::I32,
            TerminalValueRef::I64(_) => ValueKind::I64,
            TerminalValueRef::I128(_) => ValueKind::I128,
            TerminalValueRef::U8(_) => ValueKind::U8,
            TerminalValueRef::U16(_) => ValueKind::U16,
            TerminalValueRef::U32(_) => ValueKind::U32,
            TerminalValueRef::U64(_) => ValueKind::U64,
            TerminalValueRef::U128(_) => ValueKind::U128,
            TerminalValueRef::String(_) => ValueKind::String,
            TerminalValueRef::Custom { value_kind, .. } => ValueKind::Custom(*value_kind),
        }
    }
}

/// A run of scalars read in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalValueBatchRef<'de> {
    U8(&'de [u8]),
}

/// One step of a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalEvent<'de, X: CustomValueKind> {
    ContainerStart(ContainerHeader<X>),
    ContainerEnd(ContainerHeader<X>),
    TerminalValue(TerminalValueRef<'de, X>),
    TerminalValueBatch(TerminalValueBatchRef<'de>),
    End,
    DecodeError(DecodeError),
}

impl<X: CustomValueKind> TraversalEvent<'_, X> {
    /// True for `End` and `DecodeError`, after which nothing else follows.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TraversalEvent::End | TraversalEvent::DecodeError(_))
    }
}

/// An open container on the traversal stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerState<X: CustomValueKind> {
    pub container_header: ContainerHeader<X>,
    pub container_start_offset: usize,
    /// Index of the child currently being read.
    pub current_child_index: usize,
    pub(crate) next_child_index: usize,
}

/// Where an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'t, X: CustomValueKind> {
    pub start_offset: usize,
    pub end_offset: usize,
    /// Open containers, outermost first. Never includes the container a
    /// start or end event is about.
    pub ancestor_path: &'t [ContainerState<X>],
}

impl<X: CustomValueKind> Location<'_, X> {
    pub fn depth(&self) -> usize {
        self.ancestor_path.len()
    }

    /// Renders the ancestor path, e.g. `Tuple[1]/Array[0]`.
    pub fn path(&self) -> String {
        if self.ancestor_path.is_empty() {
            return "$".to_string();
        }
        self.ancestor_path
            .iter()
            .map(|state| {
                format!(
                    "{}[{}]",
                    container_name(&state.container_header),
                    state.current_child_index
                )
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn container_name<X: CustomValueKind>(header: &ContainerHeader<X>) -> &'static str {
    match header {
        ContainerHeader::Tuple { .. } => "Tuple",
        ContainerHeader::EnumVariant { .. } => "Enum",
        ContainerHeader::Array { .. } => "Array",
        ContainerHeader::Map { .. } => "Map",
    }
}

/// An event together with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTraversalEvent<'t, 'de, X: CustomValueKind> {
    pub location: Location<'t, X>,
    pub event: TraversalEvent<'de, X>,
}

impl<X: CustomValueKind> fmt::Display for ContainerHeader<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerHeader::Tuple { length } => write!(f, "Tuple({length})"),
            ContainerHeader::EnumVariant {
                discriminator,
                length,
            } => write!(f, "Enum::{discriminator}({length})"),
            ContainerHeader::Array {
                element_value_kind,
                length,
            } => write!(f, "Array<0x{:02x}>({length})", element_value_kind.as_u8()),
            ContainerHeader::Map {
                key_value_kind,
                value_value_kind,
                length,
            } => write!(
                f,
                "Map<0x{:02x}, 0x{:02x}>({length})",
                key_value_kind.as_u8(),
                value_value_kind.as_u8()
            ),
        }
    }
}
