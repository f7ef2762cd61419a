//! Core data types for the complementary-pair order book
//!
//! `Order` and `Fill` implement SSZ serialization for deterministic encoding.
//! All prices and quantities are plain integers (unit price, token count).
//!
//! ## Types
//!
//! - [`Order`]: A resting or tombstoned limit order
//! - [`Side`]: Bid or Ask
//! - [`Fill`]: One matched tranche against a resting order
//! - [`Execution`]: Summary of one engine call
//! - [`ProductId`], [`OrderId`], [`AccountId`]: Identifiers

mod execution;
mod fill;
mod ids;
mod order;

// Re-export all types at module level
pub use execution::{Execution, Payout, PayoutReason};
pub use fill::{Fill, FillKind};
pub use ids::{AccountId, OrderId, ProductId};
pub use order::{Order, Side};
