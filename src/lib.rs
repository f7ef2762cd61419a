//! # Complement CLOB
//!
//! Limit order book for complementary outcome tokens (e.g. YES/NO shares).
//!
//! ## Architecture
//!
//! - **Types**: Orders, fills, execution reports, identifiers
//! - **OrderBook**: one price-ordered linked list per (product, side)
//! - **Accounting**: token ledger plus escrow / prize pool counters
//! - **Engine**: placement, complete-set minting, crossing, takes, cancels
//!
//! ## Design Principles
//!
//! 1. **Conservation**: custodied funds always equal escrow plus prize pool
//! 2. **Atomic Calls**: every call plans, verifies, then commits
//! 3. **Stable Ids**: filled and canceled orders are tombstoned, never reused
//! 4. **Determinism**: identical call sequences yield identical state roots

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Fill, Execution, identifiers
pub mod types;

/// Order book: per-product bid/ask lists
pub mod orderbook;

/// Token balances and collateral counters
pub mod accounting;

/// Matching engine
pub mod engine;

/// Product pairs and engine settings
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use accounting::{Ledger, TokenBalances, Treasury};
pub use config::EngineConfig;
pub use engine::{MatchingEngine, SharedEngine};
pub use error::{ConfigError, EngineError};
pub use orderbook::{OrderBook, PriceLevelList};
pub use types::{AccountId, Execution, Fill, FillKind, Order, OrderId, Payout, PayoutReason, ProductId, Side};
