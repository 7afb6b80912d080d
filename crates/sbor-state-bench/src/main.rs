//! Benchmark for substate encoding using generated vault records.
//!
//! Builds a mix of V1 and V2 vault substates, then times encoding, typed
//! decoding, traversal, schema validation and upgrading.
//!
//! Usage: `bench-substates [COUNT] [SEED_JSON]`. The seed file is a JSON
//! array of `{ "amount": u64, "memo": string | null }` objects cycled over.

use std::fs;
use std::time::Instant;

use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use sbor_state::extension::ledger::{Decimal, LedgerCustomValueKind, NODE_ID_LENGTH, NodeId, Reference};
use sbor_state::limits::DEFAULT_MAX_DEPTH;
use sbor_state::substate::{
    FieldContentSource, FieldPayload, FieldSubstate, decode_substate, encode_substate,
};
use sbor_state::traversal::TraversalEvent;
use sbor_state::versioning::Versioned;
use sbor_state::{
    declare_payload_new_type, define_versioned, generate_full_schema_from_single_type,
    impl_codec_for_struct, traverse, validate_payload_against_schema,
};

// =============================================================================
// RECORD TYPES
// =============================================================================

/// Entity type byte for generated vault owners.
const ENTITY_TYPE_ACCOUNT: u8 = 0x51;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultV1 {
    pub owner: Reference,
    pub amount: Decimal,
}
impl_codec_for_struct!(LedgerCustomValueKind; VaultV1 { owner: Reference, amount: Decimal });

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultV2 {
    pub owner: Reference,
    pub amount: Decimal,
    pub memo: Option<String>,
    pub frozen: bool,
}
impl_codec_for_struct!(LedgerCustomValueKind; VaultV2 {
    owner: Reference,
    amount: Decimal,
    memo: Option<String>,
    frozen: bool,
});

impl From<VaultV1> for VaultV2 {
    fn from(v1: VaultV1) -> Self {
        Self {
            owner: v1.owner,
            amount: v1.amount,
            memo: None,
            frozen: false,
        }
    }
}

define_versioned! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum VersionedVault {
        previous_versions: [
            0 => V1(VaultV1) as as_v1: { updates_to: V2 },
        ],
        latest_version: {
            1 => V2(VaultV2) as as_v2,
        },
    }
}

declare_payload_new_type! {
    payload_trait: FieldPayload,
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct VaultFieldPayload(VersionedVault);
}

type VaultSubstate = FieldSubstate<VaultFieldPayload>;

// =============================================================================
// INPUT
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct SeedAccount {
    amount: u64,
    memo: Option<String>,
}

fn default_seed() -> Vec<SeedAccount> {
    vec![
        SeedAccount {
            amount: 1_000,
            memo: None,
        },
        SeedAccount {
            amount: 42,
            memo: Some("payroll".to_string()),
        },
        SeedAccount {
            amount: 7_500_000,
            memo: Some("treasury reserve".to_string()),
        },
    ]
}

fn load_seed(path: Option<String>) -> Vec<SeedAccount> {
    let Some(path) = path else {
        return default_seed();
    };
    let json = fs::read_to_string(&path).expect("Failed to read seed file");
    let seed: Vec<SeedAccount> = serde_json::from_str(&json).expect("Failed to parse seed JSON");
    if seed.is_empty() {
        warn!(%path, "seed file is empty, using built-in seed");
        return default_seed();
    }
    seed
}

/// A fresh account address from two random UUIDs.
fn random_owner() -> Reference {
    let mut address = [0u8; NODE_ID_LENGTH - 1];
    address[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    address[16..].copy_from_slice(&Uuid::now_v7().as_bytes()[..NODE_ID_LENGTH - 1 - 16]);
    Reference(NodeId::new(ENTITY_TYPE_ACCOUNT, &address))
}

fn build_substates(count: usize, seed: &[SeedAccount]) -> Vec<VaultSubstate> {
    (0..count)
        .map(|i| {
            let account = &seed[i % seed.len()];
            let owner = random_owner();
            let amount = Decimal::from(account.amount);
            // Half the records are still stored in their first generation
            if i % 2 == 0 {
                FieldContentSource::<VaultFieldPayload>::into_locked_substate(VaultV1 {
                    owner,
                    amount,
                })
            } else {
                FieldContentSource::<VaultFieldPayload>::into_unlocked_substate(VaultV2 {
                    owner,
                    amount,
                    memo: account.memo.clone(),
                    frozen: i % 7 == 0,
                })
            }
        })
        .collect()
}

// =============================================================================
// BENCHMARK
// =============================================================================

const ITERS: u32 = 10;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let mut args = std::env::args().skip(1);
    let count: usize = args
        .next()
        .map(|arg| arg.parse().expect("COUNT must be a number"))
        .unwrap_or(100_000);
    let seed = load_seed(args.next());

    info!(count, seed_len = seed.len(), "building substates");
    let build_start = Instant::now();
    let substates = build_substates(count, &seed);
    let build_time = build_start.elapsed();
    println!("Built {} substates in {:?}", substates.len(), build_time);

    // Encode
    let encode_start = Instant::now();
    let mut encoded = Vec::new();
    for _ in 0..ITERS {
        encoded = substates
            .iter()
            .map(|substate| {
                encode_substate::<LedgerCustomValueKind, _>(substate).expect("Failed to encode")
            })
            .collect::<Vec<_>>();
    }
    let encode_time = encode_start.elapsed() / ITERS;
    let total_bytes: usize = encoded.iter().map(Vec::len).sum();

    println!("\nEncode: {:?} (avg of {} iterations)", encode_time, ITERS);
    println!(
        "  Throughput: {:.2} MB/s",
        (total_bytes as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Typed decode
    let decode_start = Instant::now();
    let mut decoded = Vec::new();
    for _ in 0..ITERS {
        decoded = encoded
            .iter()
            .map(|bytes| {
                decode_substate::<LedgerCustomValueKind, VaultSubstate>(bytes)
                    .expect("Failed to decode")
            })
            .collect::<Vec<_>>();
    }
    let decode_time = decode_start.elapsed() / ITERS;
    assert_eq!(decoded, substates);

    println!("\nDecode: {:?} (avg of {} iterations)", decode_time, ITERS);
    println!(
        "  Throughput: {:.2} MB/s",
        (total_bytes as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );

    // Traverse
    let traverse_start = Instant::now();
    let mut event_count = 0;
    for _ in 0..ITERS {
        event_count = 0;
        for bytes in &encoded {
            for (event, offset) in traverse::<LedgerCustomValueKind>(bytes, DEFAULT_MAX_DEPTH, true) {
                if let TraversalEvent::DecodeError(error) = event {
                    panic!("Traversal failed at byte {offset}: {error}");
                }
                event_count += 1;
            }
        }
    }
    let traverse_time = traverse_start.elapsed() / ITERS;

    println!("\nTraverse: {:?} (avg of {} iterations)", traverse_time, ITERS);
    println!("  Events: {}", event_count);

    // Validate against the generated schema
    let (type_index, schema) =
        generate_full_schema_from_single_type::<VaultSubstate, LedgerCustomValueKind>()
            .expect("Failed to generate schema");
    let validate_start = Instant::now();
    for _ in 0..ITERS {
        for bytes in &encoded {
            validate_payload_against_schema(bytes, &schema, type_index, DEFAULT_MAX_DEPTH)
                .expect("Failed to validate");
        }
    }
    let validate_time = validate_start.elapsed() / ITERS;

    println!("\nValidate: {:?} (avg of {} iterations)", validate_time, ITERS);
    println!("  Schema types: {}", schema.type_kinds.len());

    // Upgrade everything to the latest generation
    let upgrade_start = Instant::now();
    let stale = decoded
        .iter()
        .filter(|substate| !substate.payload().as_content().is_fully_updated())
        .count();
    let latest: Vec<VaultV2> = decoded
        .into_iter()
        .map(|substate| substate.into_payload().into_content().into_latest())
        .collect();
    let upgrade_time = upgrade_start.elapsed();

    println!("\nUpgrade: {:?} ({} of {} were stale)", upgrade_time, stale, latest.len());

    // Summary
    println!("\n=== Summary ===");
    println!("Substates: {}", substates.len());
    println!(
        "Encoded size: {} bytes ({:.1} bytes/substate)",
        total_bytes,
        total_bytes as f64 / substates.len().max(1) as f64
    );
    let frozen = latest.iter().filter(|vault| vault.frozen).count();
    println!("Frozen vaults: {}", frozen);
    let total = latest
        .iter()
        .try_fold(Decimal::ZERO, |sum, vault| sum.checked_add(vault.amount))
        .expect("Balance overflow");
    println!("Total balance: {}", total);
    if let Some(type_name) = schema.type_name(type_index) {
        println!("Root type: {}", type_name);
    }
}
