//! Per-call execution reports.
//!
//! Every mutating engine call returns an [`Execution`] describing what it
//! did. Payouts are instructions for the host's payment layer: the engine
//! has already removed them from its custodied funds.

use crate::types::fill::Fill;
use crate::types::ids::{AccountId, OrderId};

/// Why native value left the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayoutReason {
    /// Ask maker (or `take_bid` seller) paid for tokens sold
    Proceeds,
    /// Bidder refunded the gap between its limit and the execution price
    PriceImprovement,
    /// Canceled bid's remaining collateral returned
    Refund,
}

/// A transfer of native value out of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub account: AccountId,
    pub amount: u64,
    pub reason: PayoutReason,
}

/// Result of a successful engine call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Execution {
    /// Id of the residual order inserted into the book, if any
    pub order_id: Option<OrderId>,

    /// Quantity left resting under `order_id` (0 when fully matched)
    pub remaining: u64,

    /// Matched tranches, in execution order
    pub fills: Vec<Fill>,

    /// Value the host must transfer out
    pub payouts: Vec<Payout>,
}

impl Execution {
    /// Total quantity matched by this call
    pub fn filled_quantity(&self) -> u64 {
        self.fills.iter().map(|f| f.quantity).sum()
    }

    /// Whether the call matched nothing
    pub fn is_unmatched(&self) -> bool {
        self.fills.is_empty()
    }

    /// Total value paid to one account
    pub fn paid_to(&self, account: AccountId) -> u64 {
        self.payouts
            .iter()
            .filter(|p| p.account == account)
            .map(|p| p.amount)
            .sum()
    }
}
