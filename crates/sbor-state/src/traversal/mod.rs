//! Streaming traversal of untrusted payloads.
//!
//! Walks a payload as a flat sequence of events without building values,
//! enforcing the depth bound and (optionally) exact end of input.

pub mod events;
pub mod traverser;

pub use events::{
    ContainerHeader, ContainerState, ExpectedStart, LocatedTraversalEvent, Location,
    TerminalValueBatchRef, TerminalValueRef, TraversalEvent,
};
pub use traverser::{Events, VecTraverser, traverse};
