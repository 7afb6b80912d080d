//! Custom value extensions.
//!
//! The base format stops at tag 0x7f. An extension supplies the kinds from
//! 0x80 up, their bodies, and their well-known schema types.
//!
//! - [`basic`]: no custom kinds at all
//! - [`ledger`]: node references, owned nodes and fixed-point decimals

pub mod basic;
pub mod ledger;

pub use basic::{
    BasicDecoder, BasicEncoder, BasicTraverser, BasicValue, BasicValueKind, NoCustomValue,
    NoCustomValueKind, basic_decode, basic_decode_with_options, basic_encode,
};
pub use ledger::{
    Decimal, LedgerCustomValue, LedgerCustomValueKind, LedgerDecoder, LedgerEncoder,
    LedgerTraverser, LedgerValue, LedgerValueKind, NodeId, Own, Reference, ledger_decode,
    ledger_decode_with_options, ledger_encode,
};
