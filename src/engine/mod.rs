//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Atomicity**: a call either commits all of its effects or none
//! 2. **Integer Math**: unit prices and token counts, checked arithmetic throughout
//! 3. **Synchronous Execution**: no async, no waits inside a call
//! 4. **Price-Time Priority**: best price first, then FIFO
//!
//! ## Matching Rules
//!
//! - **Bids** first mint complete sets against the complement's bids, then
//!   cross asks (lowest price first)
//! - **Asks** cross bids (highest price first) and never mint
//! - Every tranche executes at the resting order's price
//! - **Unfilled quantity** rests on the book
//!
//! ## Example
//!
//! ```
//! use complement_clob::engine::MatchingEngine;
//! use complement_clob::config::EngineConfig;
//! use complement_clob::types::{AccountId, ProductId};
//!
//! let mut engine = MatchingEngine::new(&EngineConfig::binary(10_000)).unwrap();
//! let alice = AccountId::new(1).unwrap();
//! let bob = AccountId::new(2).unwrap();
//!
//! // NO bid rests, then a YES bid at the same price mints a complete set
//! engine.make_bid(bob, ProductId(1), 5_000, 8, 40_000).unwrap();
//! let result = engine.make_bid(alice, ProductId(0), 5_000, 5, 25_000).unwrap();
//!
//! assert!(result.order_id.is_none());
//! assert_eq!(engine.ledger(alice, ProductId(0)), 5);
//! assert_eq!(engine.prize_pool(), 50_000);
//! ```

pub mod matcher;
mod settlement;
pub mod shared;

pub use matcher::MatchingEngine;
pub use shared::SharedEngine;
