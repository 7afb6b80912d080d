//! Pull-based traversal over an encoded payload.
//!
//! The traverser never recurses: open containers live on an explicit stack,
//! and the depth bound is checked before every value is read. Each call to
//! [`VecTraverser::next_event`] does a bounded amount of work, so a consumer
//! can stop at any point and drop the traverser.

use tracing::debug;

use crate::codec::Reader;
use crate::error::DecodeError;
use crate::model::{CustomValueKind, ValueKind};
use crate::traversal::events::{
    ContainerHeader, ContainerState, ExpectedStart, LocatedTraversalEvent, Location,
    TerminalValueBatchRef, TerminalValueRef, TraversalEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NextAction<X: CustomValueKind> {
    ReadRootValue,
    ReadRootValueBody(ValueKind<X>),
    /// A container start was just reported. It joins the stack on the next
    /// step so its own start event doesn't list it as an ancestor.
    EnterContainer {
        container_header: ContainerHeader<X>,
        container_start_offset: usize,
    },
    ReadNextChildOrExitContainer,
    Finish,
    Errored(DecodeError),
    Ended,
}

/// Streams [`TraversalEvent`]s out of a payload.
#[derive(Debug, Clone)]
pub struct VecTraverser<'de, X: CustomValueKind> {
    reader: Reader<'de>,
    max_depth: usize,
    check_exact_end: bool,
    container_stack: Vec<ContainerState<X>>,
    next_action: NextAction<X>,
}

impl<'de, X: CustomValueKind> VecTraverser<'de, X> {
    pub fn new(
        input: &'de [u8],
        max_depth: usize,
        expected_start: ExpectedStart<X>,
        check_exact_end: bool,
    ) -> Self {
        let next_action = match expected_start {
            ExpectedStart::Value => NextAction::ReadRootValue,
            ExpectedStart::ValueBody(value_kind) => NextAction::ReadRootValueBody(value_kind),
        };
        Self {
            reader: Reader::new(input),
            max_depth,
            check_exact_end,
            // Stack never grows past max_depth
            container_stack: Vec::with_capacity(max_depth.min(64)),
            next_action,
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Produces the next event.
    ///
    /// After `End` or `DecodeError`, keeps returning that same event.
    pub fn next_event(&mut self) -> LocatedTraversalEvent<'_, 'de, X> {
        let start_offset = self.reader.position();
        let (event, start_offset) = match self.step(start_offset) {
            Ok(located) => located,
            Err(error) => {
                let offset = self.reader.position();
                debug!(offset, path = %self.location(offset, offset).path(), %error, "payload traversal aborted");
                self.next_action = NextAction::Errored(error.clone());
                (TraversalEvent::DecodeError(error), offset)
            }
        };
        let end_offset = self.reader.position();
        LocatedTraversalEvent {
            location: self.location(start_offset, end_offset),
            event,
        }
    }

    /// Turns the traverser into an iterator of owned events with their
    /// start offsets. The iterator stops after the terminal event.
    pub fn events(self) -> Events<'de, X> {
        Events {
            traverser: self,
            done: false,
        }
    }

    fn location(&self, start_offset: usize, end_offset: usize) -> Location<'_, X> {
        Location {
            start_offset,
            end_offset,
            ancestor_path: &self.container_stack,
        }
    }

    /// Advances the state machine by one event.
    fn step(&mut self, start_offset: usize) -> Result<(TraversalEvent<'de, X>, usize), DecodeError> {
        match self.next_action.clone() {
            NextAction::ReadRootValue => {
                self.check_depth()?;
                let value_kind = self.read_value_kind()?;
                self.read_value_body(value_kind, start_offset)
            }
            NextAction::ReadRootValueBody(value_kind) => {
                self.check_depth()?;
                self.read_value_body(value_kind, start_offset)
            }
            NextAction::EnterContainer {
                container_header,
                container_start_offset,
            } => {
                self.container_stack.push(ContainerState {
                    container_header,
                    container_start_offset,
                    current_child_index: 0,
                    next_child_index: 0,
                });
                self.read_next_child_or_exit_container(start_offset)
            }
            NextAction::ReadNextChildOrExitContainer => {
                self.read_next_child_or_exit_container(start_offset)
            }
            NextAction::Finish => {
                if self.check_exact_end {
                    self.reader.check_end()?;
                }
                self.next_action = NextAction::Ended;
                Ok((TraversalEvent::End, start_offset))
            }
            NextAction::Errored(error) => Ok((TraversalEvent::DecodeError(error), start_offset)),
            NextAction::Ended => Ok((TraversalEvent::End, start_offset)),
        }
    }

    fn read_next_child_or_exit_container(
        &mut self,
        start_offset: usize,
    ) -> Result<(TraversalEvent<'de, X>, usize), DecodeError> {
        let Some(parent) = self.container_stack.last() else {
            self.next_action = NextAction::Finish;
            return self.step(start_offset);
        };
        let header = parent.container_header;
        let child_index = parent.next_child_index;

        if child_index >= header.child_count() {
            let container_start_offset = parent.container_start_offset;
            self.container_stack.pop();
            self.next_action = self.action_after_value();
            return Ok((TraversalEvent::ContainerEnd(header), container_start_offset));
        }

        self.check_depth()?;

        // Byte arrays are reported as one slice
        if let ContainerHeader::Array {
            element_value_kind: ValueKind::U8,
            length,
        } = header
        {
            let bytes = self.reader.read_bytes(length - child_index)?;
            self.advance_child(child_index, length);
            self.next_action = NextAction::ReadNextChildOrExitContainer;
            return Ok((
                TraversalEvent::TerminalValueBatch(TerminalValueBatchRef::U8(bytes)),
                start_offset,
            ));
        }

        self.advance_child(child_index, child_index + 1);
        let value_kind = match header.implicit_child_value_kind(child_index) {
            Some(value_kind) => value_kind,
            None => self.read_value_kind()?,
        };
        self.read_value_body(value_kind, start_offset)
    }

    fn advance_child(&mut self, current_child_index: usize, next_child_index: usize) {
        if let Some(parent) = self.container_stack.last_mut() {
            parent.current_child_index = current_child_index;
            parent.next_child_index = next_child_index;
        }
    }

    /// Reads a body and decides what comes after it.
    fn read_value_body(
        &mut self,
        value_kind: ValueKind<X>,
        start_offset: usize,
    ) -> Result<(TraversalEvent<'de, X>, usize), DecodeError> {
        let terminal = match value_kind {
            ValueKind::Unit => match self.reader.read_byte()? {
                0 => TerminalValueRef::Unit,
                byte => return Err(DecodeError::InvalidUnit(byte)),
            },
            ValueKind::Bool => match self.reader.read_byte()? {
                0 => TerminalValueRef::Bool(false),
                1 => TerminalValueRef::Bool(true),
                byte => return Err(DecodeError::InvalidBool(byte)),
            },
            ValueKind::I8 => TerminalValueRef::I8(i8::from_le_bytes(self.reader.read_array()?)),
            ValueKind::I16 => TerminalValueRef::I16(i16::from_le_bytes(self.reader.read_array()?)),
            ValueKind::I32 => TerminalValueRef::I32(i32::from_le_bytes(self.reader.read_array()?)),
            ValueKind::I64 => TerminalValueRef::I64(i64::from_le_bytes(self.reader.read_array()?)),
            ValueKind::I128 => {
                TerminalValueRef::I128(i128::from_le_bytes(self.reader.read_array()?))
            }
            ValueKind::U8 => TerminalValueRef::U8(self.reader.read_byte()?),
            ValueKind::U16 => TerminalValueRef::U16(u16::from_le_bytes(self.reader.read_array()?)),
            ValueKind::U32 => TerminalValueRef::U32(u32::from_le_bytes(self.reader.read_array()?)),
            ValueKind::U64 => TerminalValueRef::U64(u64::from_le_bytes(self.reader.read_array()?)),
            ValueKind::U128 => {
                TerminalValueRef::U128(u128::from_le_bytes(self.reader.read_array()?))
            }
            ValueKind::String => {
                let len = self.reader.read_size()?;
                let bytes = self.reader.read_bytes(len)?;
                let value = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
                TerminalValueRef::String(value)
            }
            ValueKind::Custom(custom_value_kind) => TerminalValueRef::Custom {
                value_kind: custom_value_kind,
                body: custom_value_kind.read_body(&mut self.reader)?,
            },
            ValueKind::Tuple => {
                let length = self.reader.read_size()?;
                return Ok(self.enter_container(ContainerHeader::Tuple { length }, start_offset));
            }
            ValueKind::Enum => {
                let discriminator = self.reader.read_byte()?;
                let length = self.reader.read_size()?;
                let header = ContainerHeader::EnumVariant {
                    discriminator,
                    length,
                };
                return Ok(self.enter_container(header, start_offset));
            }
            ValueKind::Array => {
                let element_value_kind = self.read_value_kind()?;
                let length = self.reader.read_size()?;
                let header = ContainerHeader::Array {
                    element_value_kind,
                    length,
                };
                return Ok(self.enter_container(header, start_offset));
            }
            ValueKind::Map => {
                let key_value_kind = self.read_value_kind()?;
                let value_value_kind = self.read_value_kind()?;
                let length = self.reader.read_size()?;
                let header = ContainerHeader::Map {
                    key_value_kind,
                    value_value_kind,
                    length,
                };
                return Ok(self.enter_container(header, start_offset));
            }
        };
        self.next_action = self.action_after_value();
        Ok((TraversalEvent::TerminalValue(terminal), start_offset))
    }

    fn enter_container(
        &mut self,
        container_header: ContainerHeader<X>,
        container_start_offset: usize,
    ) -> (TraversalEvent<'de, X>, usize) {
        self.next_action = NextAction::EnterContainer {
            container_header,
            container_start_offset,
        };
        (TraversalEvent::ContainerStart(container_header), container_start_offset)
    }

    fn action_after_value(&self) -> NextAction<X> {
        if self.container_stack.is_empty() {
            NextAction::Finish
        } else {
            NextAction::ReadNextChildOrExitContainer
        }
    }

    fn read_value_kind(&mut self) -> Result<ValueKind<X>, DecodeError> {
        ValueKind::try_from_u8(self.reader.read_byte()?)
    }

    /// The next value sits one level below the open containers.
    fn check_depth(&self) -> Result<(), DecodeError> {
        if self.container_stack.len() + 1 > self.max_depth {
            return Err(DecodeError::MaxDepthExceeded(self.max_depth));
        }
        Ok(())
    }
}

/// Owned event iterator returned by [`VecTraverser::events`].
#[derive(Debug, Clone)]
pub struct Events<'de, X: CustomValueKind> {
    traverser: VecTraverser<'de, X>,
    done: bool,
}

impl<'de, X: CustomValueKind> Iterator for Events<'de, X> {
    type Item = (TraversalEvent<'de, X>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let located = self.traverser.next_event();
        self.done = located.event.is_terminal();
        Some((located.event, located.location.start_offset))
    }
}

/// Traverses a complete payload from its first byte.
pub fn traverse<X: CustomValueKind>(
    payload: &[u8],
    max_depth: usize,
    check_exact_end: bool,
) -> Events<'_, X> {
    VecTraverser::new(payload, max_depth, ExpectedStart::Value, check_exact_end).events()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::basic::{NoCustomValueKind, basic_encode};
    use crate::extension::ledger::{
        Decimal, LedgerCustomValueKind, NODE_ID_LENGTH, NodeId, Reference, ledger_encode,
    };
    use crate::limits::DEFAULT_MAX_DEPTH;

    type X = NoCustomValueKind;

    fn collect(payload: &[u8], max_depth: usize, check_exact_end: bool) -> Vec<TraversalEvent<'_, X>> {
        traverse::<X>(payload, max_depth, check_exact_end)
            .map(|(event, _)| event)
            .collect()
    }

    #[test]
    fn test_scalar_root() {
        let bytes = basic_encode(&42u32).unwrap();
        assert_eq!(
            collect(&bytes, DEFAULT_MAX_DEPTH, true),
            vec![
                TraversalEvent::TerminalValue(TerminalValueRef::U32(42)),
                TraversalEvent::End,
            ]
        );
    }

    #[test]
    fn test_nested_events_and_offsets() {
        let bytes = basic_encode(&(String::from("hi"), vec![1u8, 2], Some(false))).unwrap();
        let events: Vec<_> = traverse::<X>(&bytes, DEFAULT_MAX_DEPTH, true).collect();
        let kinds: Vec<_> = events.iter().map(|(event, _)| event.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TraversalEvent::ContainerStart(ContainerHeader::Tuple { length: 3 }),
                TraversalEvent::TerminalValue(TerminalValueRef::String("hi")),
                TraversalEvent::ContainerStart(ContainerHeader::Array {
                    element_value_kind: ValueKind::U8,
                    length: 2,
                }),
                TraversalEvent::TerminalValueBatch(TerminalValueBatchRef::U8(&[1, 2])),
                TraversalEvent::ContainerEnd(ContainerHeader::Array {
                    element_value_kind: ValueKind::U8,
                    length: 2,
                }),
                TraversalEvent::ContainerStart(ContainerHeader::EnumVariant {
                    discriminator: 1,
                    length: 1,
                }),
                TraversalEvent::TerminalValue(TerminalValueRef::Bool(false)),
                TraversalEvent::ContainerEnd(ContainerHeader::EnumVariant {
                    discriminator: 1,
                    length: 1,
                }),
                TraversalEvent::ContainerEnd(ContainerHeader::Tuple { length: 3 }),
                TraversalEvent::End,
            ]
        );
        // Tuple header at 0, string kind byte at 2
        assert_eq!(events[0].1, 0);
        assert_eq!(events[1].1, 2);
        // Container ends report where the container started
        assert_eq!(events[8].1, 0);
    }

    #[test]
    fn test_ancestor_path() {
        let bytes = basic_encode(&(0u8, (vec![7u16, 8u16],))).unwrap();
        let mut traverser =
            VecTraverser::<X>::new(&bytes, DEFAULT_MAX_DEPTH, ExpectedStart::Value, true);

        let outer = traverser.next_event();
        assert!(outer.location.ancestor_path.is_empty());
        assert_eq!(outer.location.path(), "$");

        let first = traverser.next_event();
        assert_eq!(first.location.path(), "Tuple[0]");

        let inner_start = traverser.next_event();
        assert_eq!(inner_start.location.path(), "Tuple[1]");

        let array_start = traverser.next_event();
        assert_eq!(array_start.location.path(), "Tuple[1]/Tuple[0]");

        traverser.next_event();
        let eight = traverser.next_event();
        assert_eq!(eight.event, TraversalEvent::TerminalValue(TerminalValueRef::U16(8)));
        assert_eq!(eight.location.path(), "Tuple[1]/Tuple[0]/Array[1]");
        assert_eq!(eight.location.depth(), 3);
    }

    #[test]
    fn test_depth_exceeded_terminates() {
        // 10,000 nested single-field tuples, far beyond the limit
        let mut bytes = Vec::new();
        for _ in 0..10_000 {
            bytes.extend_from_slice(&[0x21, 0x01]);
        }
        bytes.extend_from_slice(&[0x00, 0x00]);

        let events = collect(&bytes, DEFAULT_MAX_DEPTH, true);
        assert_eq!(events.len(), DEFAULT_MAX_DEPTH + 1);
        assert_eq!(
            events.last(),
            Some(&TraversalEvent::DecodeError(DecodeError::MaxDepthExceeded(
                DEFAULT_MAX_DEPTH
            )))
        );
    }

    #[test]
    fn test_depth_matches_decoder() {
        let bytes = basic_encode(&vec![vec![1u8]]).unwrap();
        assert!(matches!(
            collect(&bytes, 2, true).last(),
            Some(TraversalEvent::DecodeError(DecodeError::MaxDepthExceeded(2)))
        ));
        assert_eq!(collect(&bytes, 3, true).last(), Some(&TraversalEvent::End));
    }

    #[test]
    fn test_exact_end() {
        let mut bytes = basic_encode(&(1u8,)).unwrap();
        bytes.push(0xee);

        assert_eq!(
            collect(&bytes, DEFAULT_MAX_DEPTH, true).last(),
            Some(&TraversalEvent::DecodeError(DecodeError::ExtraTrailingBytes(1)))
        );
        assert_eq!(
            collect(&bytes, DEFAULT_MAX_DEPTH, false).last(),
            Some(&TraversalEvent::End)
        );
    }

    #[test]
    fn test_errors_repeat() {
        let mut traverser = VecTraverser::<X>::new(&[0x21, 0x02, 0x07], 8, ExpectedStart::Value, true);
        let mut last = None;
        for _ in 0..6 {
            last = Some(traverser.next_event().event);
        }
        assert_eq!(
            last,
            Some(TraversalEvent::DecodeError(DecodeError::BufferUnderflow {
                required: 1,
                remaining: 0,
            }))
        );
        assert_eq!(
            traverser.next_event().event,
            TraversalEvent::DecodeError(DecodeError::BufferUnderflow {
                required: 1,
                remaining: 0,
            })
        );
    }

    #[test]
    fn test_value_body_start() {
        // A tuple body without its kind byte
        let events: Vec<_> = VecTraverser::<X>::new(
            &[0x01, 0x01, 0x01],
            DEFAULT_MAX_DEPTH,
            ExpectedStart::ValueBody(ValueKind::Tuple),
            true,
        )
        .events()
        .map(|(event, _)| event)
        .collect();
        assert_eq!(events[1], TraversalEvent::TerminalValue(TerminalValueRef::Bool(true)));
        assert_eq!(events.last(), Some(&TraversalEvent::End));
    }

    #[test]
    fn test_custom_values() {
        let reference = Reference(NodeId::new(0x5d, &[3; NODE_ID_LENGTH - 1]));
        let bytes = ledger_encode(&(reference, Decimal::ONE)).unwrap();
        let events: Vec<_> = traverse::<LedgerCustomValueKind>(&bytes, DEFAULT_MAX_DEPTH, true)
            .map(|(event, _)| event)
            .collect();
        assert!(matches!(
            events[1],
            TraversalEvent::TerminalValue(TerminalValueRef::Custom {
                value_kind: LedgerCustomValueKind::Reference,
                body,
            }) if body.len() == NODE_ID_LENGTH
        ));
        assert!(matches!(
            events[2],
            TraversalEvent::TerminalValue(TerminalValueRef::Custom {
                value_kind: LedgerCustomValueKind::Decimal,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_custom_kind_in_basic_payload() {
        let events = collect(&[0x90, 0x01], DEFAULT_MAX_DEPTH, true);
        assert_eq!(
            events,
            vec![TraversalEvent::DecodeError(DecodeError::UnexpectedCustomValueKind {
                actual: 0x90,
            })]
        );
    }
}
