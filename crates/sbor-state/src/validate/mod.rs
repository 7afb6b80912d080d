//! Schema-directed payload validation.
//!
//! Decoding into a Rust type checks a payload against that type. This module
//! checks a payload against a [`Schema`] instead, so tooling can validate
//! bytes without the Rust type at hand. It runs on the traverser, so the
//! payload is never materialized and nesting is bounded by `max_depth`.

use std::borrow::Cow;

use tracing::debug;

use crate::error::PayloadValidationError;
use crate::model::ValueKind;
use crate::schema::{CustomSchema, LocalTypeIndex, Schema, TypeKind};
use crate::traversal::{
    ContainerHeader, ExpectedStart, LocatedTraversalEvent, TerminalValueBatchRef, TraversalEvent,
    VecTraverser,
};

/// What the children of an open container must look like.
#[derive(Debug)]
enum ChildTypes {
    Any,
    Fields(Vec<LocalTypeIndex>),
    Element(LocalTypeIndex),
    Map {
        key_type: LocalTypeIndex,
        value_type: LocalTypeIndex,
    },
}

#[derive(Debug)]
struct Frame {
    child_types: ChildTypes,
    next_child: usize,
}

/// Validates that `payload` is a well-formed value of type `type_index`.
///
/// Checks value kinds, tuple and enum arity, enum variants and collection
/// element kinds, and that the payload has no trailing bytes.
pub fn validate_payload_against_schema<X: CustomSchema>(
    payload: &[u8],
    schema: &Schema<X>,
    type_index: LocalTypeIndex,
    max_depth: usize,
) -> Result<(), PayloadValidationError> {
    let mut traverser = VecTraverser::<X>::new(payload, max_depth, ExpectedStart::Value, true);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let located = traverser.next_event();
        match validate_event(schema, type_index, &mut stack, &located) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(error) => {
                debug!(
                    offset = located.location.start_offset,
                    path = %located.location.path(),
                    %error,
                    "payload failed schema validation"
                );
                return Err(error);
            }
        }
    }
}

/// Checks one event. Returns `Ok(true)` once the payload ended cleanly.
fn validate_event<X: CustomSchema>(
    schema: &Schema<X>,
    root_type: LocalTypeIndex,
    stack: &mut Vec<Frame>,
    located: &LocatedTraversalEvent<'_, '_, X>,
) -> Result<bool, PayloadValidationError> {
    let offset = located.location.start_offset;
    match &located.event {
        TraversalEvent::ContainerStart(header) => {
            let expected = next_expected_type(stack, root_type);
            let type_kind = resolve_checked(schema, expected, header.value_kind(), offset)?;
            let child_types = match type_kind.as_deref() {
                None | Some(TypeKind::Any) => ChildTypes::Any,
                Some(kind) => child_types_for(schema, kind, header, offset)?,
            };
            stack.push(Frame {
                child_types,
                next_child: 0,
            });
            Ok(false)
        }
        TraversalEvent::ContainerEnd(_) => {
            stack.pop();
            Ok(false)
        }
        TraversalEvent::TerminalValue(value) => {
            let expected = next_expected_type(stack, root_type);
            resolve_checked(schema, expected, value.value_kind(), offset)?;
            Ok(false)
        }
        TraversalEvent::TerminalValueBatch(TerminalValueBatchRef::U8(bytes)) => {
            // The array header already matched the element type against u8
            if let Some(frame) = stack.last_mut() {
                frame.next_child += bytes.len();
            }
            Ok(false)
        }
        TraversalEvent::End => Ok(true),
        TraversalEvent::DecodeError(error) => Err(PayloadValidationError::DecodeError {
            error: error.clone(),
            offset,
            path: located.location.path(),
        }),
    }
}

/// Type of the next value: the root, or the next child of the open container.
/// `None` means anything goes.
fn next_expected_type(stack: &mut [Frame], root_type: LocalTypeIndex) -> Option<LocalTypeIndex> {
    let Some(frame) = stack.last_mut() else {
        return Some(root_type);
    };
    let index = frame.next_child;
    frame.next_child += 1;
    match &frame.child_types {
        ChildTypes::Any => None,
        ChildTypes::Fields(field_types) => field_types.get(index).copied(),
        ChildTypes::Element(element_type) => Some(*element_type),
        ChildTypes::Map {
            key_type,
            value_type,
        } => {
            if index % 2 == 0 {
                Some(*key_type)
            } else {
                Some(*value_type)
            }
        }
    }
}

/// Resolves the expected type and checks the payload's value kind against it.
fn resolve_checked<'s, X: CustomSchema>(
    schema: &'s Schema<X>,
    expected: Option<LocalTypeIndex>,
    actual: ValueKind<X>,
    offset: usize,
) -> Result<Option<Cow<'s, TypeKind<X, LocalTypeIndex>>>, PayloadValidationError> {
    let Some(type_index) = expected else {
        return Ok(None);
    };
    let type_kind = schema.resolve_type_kind(type_index)?;
    check_value_kind(&type_kind, actual, offset)?;
    Ok(Some(type_kind))
}

fn check_value_kind<X: CustomSchema>(
    type_kind: &TypeKind<X, LocalTypeIndex>,
    actual: ValueKind<X>,
    offset: usize,
) -> Result<(), PayloadValidationError> {
    match type_kind.value_kind() {
        Some(expected) if expected != actual => Err(PayloadValidationError::ValueKindMismatch {
            expected: expected.as_u8(),
            actual: actual.as_u8(),
            offset,
        }),
        _ => Ok(()),
    }
}

/// Checks a container header against its type and returns its child types.
fn child_types_for<X: CustomSchema>(
    schema: &Schema<X>,
    type_kind: &TypeKind<X, LocalTypeIndex>,
    header: &ContainerHeader<X>,
    offset: usize,
) -> Result<ChildTypes, PayloadValidationError> {
    let child_types = match (type_kind, header) {
        (TypeKind::Tuple { field_types }, ContainerHeader::Tuple { length }) => {
            check_length(field_types.len(), *length, offset)?;
            ChildTypes::Fields(field_types.clone())
        }
        (
            TypeKind::Enum { variants },
            ContainerHeader::EnumVariant {
                discriminator,
                length,
            },
        ) => {
            let field_types =
                variants
                    .get(discriminator)
                    .ok_or(PayloadValidationError::UnknownEnumVariant {
                        discriminator: *discriminator,
                        offset,
                    })?;
            check_length(field_types.len(), *length, offset)?;
            ChildTypes::Fields(field_types.clone())
        }
        (
            TypeKind::Array { element_type },
            ContainerHeader::Array {
                element_value_kind, ..
            },
        ) => {
            let element_kind = schema.resolve_type_kind(*element_type)?;
            check_value_kind(&element_kind, *element_value_kind, offset)?;
            ChildTypes::Element(*element_type)
        }
        (
            TypeKind::Map {
                key_type,
                value_type,
            },
            ContainerHeader::Map {
                key_value_kind,
                value_value_kind,
                ..
            },
        ) => {
            let key_kind = schema.resolve_type_kind(*key_type)?;
            check_value_kind(&key_kind, *key_value_kind, offset)?;
            let value_kind = schema.resolve_type_kind(*value_type)?;
            check_value_kind(&value_kind, *value_value_kind, offset)?;
            ChildTypes::Map {
                key_type: *key_type,
                value_type: *value_type,
            }
        }
        // Kinds were compared before this point
        _ => {
            return Err(PayloadValidationError::ValueKindMismatch {
                expected: type_kind.value_kind().map_or(0, |kind| kind.as_u8()),
                actual: header.value_kind().as_u8(),
                offset,
            });
        }
    };
    Ok(child_types)
}

fn check_length(expected: usize, actual: usize, offset: usize) -> Result<(), PayloadValidationError> {
    if expected != actual {
        return Err(PayloadValidationError::LengthMismatch {
            expected,
            actual,
            offset,
        });
    }
    Ok(())
}
