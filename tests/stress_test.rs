//! Stress tests for the complement CLOB.
//!
//! These tests verify:
//! 1. Funds and tokens are conserved under a long random workload
//! 2. Every book stays consistent after thousands of mixed calls
//! 3. Determinism is preserved across runs
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

mod common;

use std::time::Instant;

use complement_clob::{AccountId, EngineConfig, MatchingEngine, OrderId, ProductId, Side, TokenBalances};

use common::{account, assert_invariants, NO, YES};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

const FACE: u64 = 10_000;

const ACCOUNTS: u64 = 16;

/// Tokens handed to every account per product before the run
const STARTING_TOKENS: u64 = 1_000;

/// Full invariant sweep interval (the sweep walks every book)
const CHECK_EVERY: usize = 250;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Tally of a workload run
#[derive(Debug, Default)]
struct Outcome {
    accepted: usize,
    rejected: usize,
    fills: usize,
    paid_in: u64,
    paid_out: u64,
}

fn seeded_engine() -> MatchingEngine {
    let mut engine = MatchingEngine::new(&EngineConfig::binary(FACE)).unwrap();
    for raw in 1..=ACCOUNTS {
        for product in [YES, NO] {
            engine
                .token_ledger_mut()
                .credit(account(raw), product, STARTING_TOKENS)
                .unwrap();
        }
    }
    engine
}

/// Drive `count` random calls from `seed`, tracking resting ids for cancels and takes.
fn run_workload(engine: &mut MatchingEngine, seed: u64, count: usize, check: bool) -> Outcome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut resting: Vec<(ProductId, Side, OrderId, AccountId)> = Vec::new();
    let mut outcome = Outcome::default();

    for step in 0..count {
        let caller = account(rng.gen_range(1..=ACCOUNTS));
        let product = if rng.gen_bool(0.5) { YES } else { NO };
        let price: u64 = rng.gen_range(3_000..=7_000);
        let amount: u64 = rng.gen_range(1..=20);

        let roll: u32 = rng.gen_range(0..100);
        let (result, paid_in) = if roll < 45 {
            (engine.make_bid(caller, product, price, amount, price * amount), price * amount)
        } else if roll < 80 {
            (engine.make_ask(caller, product, price, amount), 0)
        } else if !resting.is_empty() {
            let (product, side, order_id, maker) = resting.swap_remove(rng.gen_range(0..resting.len()));
            match (side, roll < 90) {
                (Side::Bid, true) => (engine.cancel_bid(maker, product, order_id), 0),
                (Side::Ask, true) => (engine.cancel_ask(maker, product, order_id), 0),
                (Side::Bid, false) => (engine.take_bid(caller, product, order_id), 0),
                (Side::Ask, false) => {
                    let payment = engine
                        .asks(product, order_id)
                        .map(|o| o.price * o.amount)
                        .unwrap_or(0);
                    (engine.take_ask(caller, product, order_id, payment), payment)
                }
            }
        } else {
            continue;
        };

        match result {
            Ok(execution) => {
                outcome.accepted += 1;
                outcome.fills += execution.fills.len();
                outcome.paid_in += paid_in;
                outcome.paid_out += execution.payouts.iter().map(|p| p.amount).sum::<u64>();
                if let Some(order_id) = execution.order_id {
                    let side = if roll < 45 { Side::Bid } else { Side::Ask };
                    resting.push((product, side, order_id, caller));
                }
            }
            Err(_) => outcome.rejected += 1,
        }

        if check && step % CHECK_EVERY == 0 {
            assert_invariants(engine);
            assert_eq!(engine.custodied_funds(), outcome.paid_in - outcome.paid_out);
        }
    }
    outcome
}

fn run_deterministic_sequence(seed: u64, count: usize) -> [u8; 32] {
    let mut engine = seeded_engine();
    run_workload(&mut engine, seed, count, false);
    engine.state_root().unwrap()
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Long mixed workload with conservation checks along the way.
///
/// # Verification
/// - No panics during execution
/// - Custody equals net value paid in at every checkpoint
/// - Minted supply on each side equals prize pool over face value
#[test]
fn stress_mixed_workload() {
    println!("\n=== STRESS TEST: Mixed Workload ===\n");

    const OPS: usize = 20_000;
    let mut engine = seeded_engine();

    let start = Instant::now();
    let outcome = run_workload(&mut engine, 42, OPS, true);
    let elapsed = start.elapsed();

    assert_invariants(&engine);
    assert_eq!(engine.custodied_funds(), outcome.paid_in - outcome.paid_out);

    let minted = engine.prize_pool() / FACE;
    let seeded = ACCOUNTS * STARTING_TOKENS;
    assert_eq!(engine.prize_pool() % FACE, 0);
    assert_eq!(engine.token_ledger().supply(YES), seeded + minted);
    assert_eq!(engine.token_ledger().supply(NO), seeded + minted);

    println!("  Calls accepted:    {:>12}", outcome.accepted);
    println!("  Calls rejected:    {:>12}", outcome.rejected);
    println!("  Fills generated:   {:>12}", outcome.fills);
    println!("  Complete sets:     {:>12}", minted);
    println!("  Escrow:            {:>12}", engine.escrow());
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!("  State root:        {}", engine.state_root_hex().unwrap());

    assert!(outcome.fills > 0, "Expected some fills to occur");
    assert!(minted > 0, "Expected some complete sets to be minted");

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Same seed, same state root; different seed, different root.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_COUNT: usize = 5_000;
    const SEED: u64 = 12345;

    let root1 = run_deterministic_sequence(SEED, TEST_COUNT);
    let root2 = run_deterministic_sequence(SEED, TEST_COUNT);

    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));

    assert_eq!(root1, root2, "State roots must match for determinism");

    let root3 = run_deterministic_sequence(SEED + 1, TEST_COUNT);
    println!("  Different seed:   {}", hex::encode(root3));
    assert_ne!(root1, root3, "Different seeds should produce different roots");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}

/// Mass cancellation drains escrow back to exactly the prize pool.
#[test]
fn stress_cancel_everything() {
    println!("\n=== CANCELLATION STRESS TEST ===\n");

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut engine = seeded_engine();
    let mut placed = Vec::new();

    for _ in 0..5_000 {
        let caller = account(rng.gen_range(1..=ACCOUNTS));
        let product = if rng.gen_bool(0.5) { YES } else { NO };
        let amount: u64 = rng.gen_range(1..=10);
        // Half face on both sides: each mint consumes exactly its own collateral
        if let Ok(execution) = engine.make_bid(caller, product, FACE / 2, amount, FACE / 2 * amount) {
            if let Some(order_id) = execution.order_id {
                placed.push((product, order_id, caller));
            }
        }
    }

    let mut canceled = 0;
    for (product, order_id, maker) in placed {
        if engine.cancel_bid(maker, product, order_id).is_ok() {
            canceled += 1;
        }
    }

    println!("  Bids canceled:     {:>12}", canceled);
    println!("  Prize pool:        {:>12}", engine.prize_pool());

    assert_eq!(engine.escrow(), 0);
    assert!(engine.best_bid_id(YES).is_none());
    assert!(engine.best_bid_id(NO).is_none());
    assert_eq!(engine.custodied_funds(), engine.prize_pool());
    assert_invariants(&engine);

    println!("\n=== CANCELLATION TEST PASSED ===\n");
}
