//! Complement CLOB - demo binary
//!
//! Runs a short YES/NO session against an engine built from a JSON config
//! (first argument) or the default single pair.

use std::process::ExitCode;

use complement_clob::{AccountId, EngineConfig, EngineError, MatchingEngine, ProductId};
use tracing::{error, info, Level};

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(%path, "failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let mut engine = match MatchingEngine::new(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("invalid config: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_session(&mut engine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("session failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_session(engine: &mut MatchingEngine) -> Result<(), EngineError> {
    let Some(yes) = engine.products().next() else {
        return Ok(());
    };
    let no = engine.complement(yes).unwrap_or(ProductId(1));
    let face = engine.token_price(yes).unwrap_or(0);
    let half = face / 2;

    let (alice, bob, carol) = match (AccountId::new(1), AccountId::new(2), AccountId::new(3)) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => return Ok(()),
    };

    info!(%yes, %no, face, "session start");

    // Complete-set mint: bob's NO bid rests, alice's YES bid pairs with it
    engine.make_bid(bob, no, half, 8, half * 8)?;
    let minted = engine.make_bid(alice, yes, half, 5, half * 5)?;
    info!(fills = minted.fills.len(), prize_pool = engine.prize_pool(), "minted");

    // Alice resells YES; carol lifts part of it with a higher limit
    engine.make_ask(alice, yes, half + 500, 5)?;
    let crossed = engine.make_bid(carol, yes, half + 1_000, 3, (half + 1_000) * 3)?;
    info!(
        filled = crossed.filled_quantity(),
        improvement = crossed.paid_to(carol),
        "crossed"
    );

    // Bob withdraws what is left of his NO bid
    if let Some(id) = engine.best_bid_id(no) {
        let refund = engine.cancel_bid(bob, no, id)?;
        info!(refund = refund.paid_to(bob), "canceled");
    }

    println!();
    println!("  escrow:     {}", engine.escrow());
    println!("  prize pool: {}", engine.prize_pool());
    println!("  custody:    {}", engine.custodied_funds());
    println!("  balanced:   {}", engine.treasury().is_balanced());
    println!("  state root: {}", engine.state_root_hex()?);
    Ok(())
}
