//! Prints the traversal of a ledger payload file.

use std::fs;

use sbor_state::extension::ledger::{
    DECIMAL_LENGTH, Decimal, LedgerCustomValueKind, LedgerTraverser, NODE_ID_LENGTH, NodeId,
};
use sbor_state::limits::DEFAULT_MAX_DEPTH;
use sbor_state::traversal::{ExpectedStart, TerminalValueBatchRef, TerminalValueRef, TraversalEvent};

fn format_terminal(value: &TerminalValueRef<'_, LedgerCustomValueKind>) -> String {
    match value {
        TerminalValueRef::Unit => "()".to_string(),
        TerminalValueRef::Bool(b) => format!("{}", b),
        TerminalValueRef::I8(v) => format!("{}i8", v),
        TerminalValueRef::I16(v) => format!("{}i16", v),
        TerminalValueRef::I32(v) => format!("{}i32", v),
        TerminalValueRef::I64(v) => format!("{}i64", v),
        TerminalValueRef::I128(v) => format!("{}i128", v),
        TerminalValueRef::U8(v) => format!("{}u8", v),
        TerminalValueRef::U16(v) => format!("{}u16", v),
        TerminalValueRef::U32(v) => format!("{}u32", v),
        TerminalValueRef::U64(v) => format!("{}u64", v),
        TerminalValueRef::U128(v) => format!("{}u128", v),
        TerminalValueRef::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.len() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        TerminalValueRef::Custom { value_kind, body } => match value_kind {
            LedgerCustomValueKind::Reference | LedgerCustomValueKind::Own => {
                match <[u8; NODE_ID_LENGTH]>::try_from(*body) {
                    Ok(bytes) => format!("{:?}({})", value_kind, NodeId(bytes)),
                    Err(_) => format!("{:?}(<{} bytes>)", value_kind, body.len()),
                }
            }
            LedgerCustomValueKind::Decimal => match <[u8; DECIMAL_LENGTH]>::try_from(*body) {
                Ok(bytes) => format!("Decimal({})", Decimal::from_attos(i128::from_le_bytes(bytes))),
                Err(_) => format!("Decimal(<{} bytes>)", body.len()),
            },
        },
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "payload.bin".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes\n", data.len());

    let mut traverser = LedgerTraverser::new(&data, DEFAULT_MAX_DEPTH, ExpectedStart::Value, true);
    loop {
        let located = traverser.next_event();
        let indent = "  ".repeat(located.location.depth());
        let offset = located.location.start_offset;
        match located.event {
            TraversalEvent::ContainerStart(header) => {
                println!("{:>6} {}{} {{", offset, indent, header);
            }
            TraversalEvent::ContainerEnd(_) => {
                println!("{:>6} {}}}", located.location.end_offset, indent);
            }
            TraversalEvent::TerminalValue(value) => {
                println!("{:>6} {}{}", offset, indent, format_terminal(&value));
            }
            TraversalEvent::TerminalValueBatch(TerminalValueBatchRef::U8(bytes)) => {
                let hex: String = bytes.iter().take(32).map(|b| format!("{:02x}", b)).collect();
                let ellipsis = if bytes.len() > 32 { "..." } else { "" };
                println!("{:>6} {}0x{}{} ({} bytes)", offset, indent, hex, ellipsis, bytes.len());
            }
            TraversalEvent::End => {
                println!("\nOK: {} bytes", located.location.end_offset);
                break;
            }
            TraversalEvent::DecodeError(error) => {
                println!(
                    "\nError at byte {} ({}): {}",
                    offset,
                    located.location.path(),
                    error
                );
                std::process::exit(1);
            }
        }
    }
}
