//! Staged settlement for one engine call.
//!
//! Matching runs in two phases:
//!
//! 1. **Plan**: walk the books read-only and record every fill, token delta
//!    and payout in a [`Settlement`], applying counter changes to a copy of
//!    the [`Treasury`].
//! 2. **Commit**: once [`Settlement::verify`] accepts the token deltas, apply
//!    everything to the live state. Nothing in the commit phase can fail for
//!    a verified plan.
//!
//! A rejected plan is simply dropped, so failed calls leave no trace.

use std::collections::BTreeMap;

use tracing::warn;

use crate::accounting::{TokenBalances, Treasury};
use crate::error::EngineError;
use crate::types::{AccountId, FillKind, OrderId, Payout, PayoutReason, ProductId, Side};

/// A resting order consumption decided during planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlannedFill {
    pub kind: FillKind,
    pub product: ProductId,
    pub side: Side,
    pub order_id: OrderId,
    pub maker: AccountId,
    pub price: u64,
    pub quantity: u64,
}

/// Staged effects of one call
#[derive(Debug, Clone)]
pub(crate) struct Settlement {
    pub treasury: Treasury,
    pub fills: Vec<PlannedFill>,
    pub payouts: Vec<Payout>,
    deltas: BTreeMap<(AccountId, ProductId), i128>,
}

impl Settlement {
    pub fn new(treasury: Treasury) -> Self {
        Self {
            treasury,
            fills: Vec::new(),
            payouts: Vec::new(),
            deltas: BTreeMap::new(),
        }
    }

    pub fn credit(&mut self, account: AccountId, product: ProductId, amount: u64) {
        *self.deltas.entry((account, product)).or_insert(0) += i128::from(amount);
    }

    pub fn debit(&mut self, account: AccountId, product: ProductId, amount: u64) {
        *self.deltas.entry((account, product)).or_insert(0) -= i128::from(amount);
    }

    /// Pay collateral out of escrow
    pub fn release(&mut self, account: AccountId, amount: u64, reason: PayoutReason) -> Result<(), EngineError> {
        self.treasury.release(amount)?;
        self.push_payout(account, amount, reason);
        Ok(())
    }

    /// Forward a payment that never enters escrow
    pub fn forward(&mut self, account: AccountId, amount: u64, reason: PayoutReason) {
        self.push_payout(account, amount, reason);
    }

    fn push_payout(&mut self, account: AccountId, amount: u64, reason: PayoutReason) {
        if amount > 0 {
            self.payouts.push(Payout { account, amount, reason });
        }
    }

    /// Check that every net token delta fits the current balances
    pub fn verify<T: TokenBalances>(&self, ledger: &T) -> Result<(), EngineError> {
        for (&(account, product), &delta) in &self.deltas {
            let available = ledger.balance_of(account, product);
            let after = i128::from(available) + delta;
            if after < 0 {
                warn!(%account, %product, available, %delta, "settlement would overdraw tokens");
                return Err(EngineError::InsufficientTokenBalance {
                    account,
                    product,
                    required: u64::try_from(-delta).unwrap_or(u64::MAX),
                    available,
                });
            }
            if after > i128::from(u64::MAX) {
                return Err(EngineError::Overflow);
            }
        }
        Ok(())
    }

    /// Apply net token deltas to the ledger
    pub fn apply_ledger<T: TokenBalances>(&self, ledger: &mut T) -> Result<(), EngineError> {
        for (&(account, product), &delta) in &self.deltas {
            let magnitude = u64::try_from(delta.unsigned_abs()).map_err(|_| EngineError::Overflow)?;
            if delta > 0 {
                ledger.credit(account, product, magnitude)?;
            } else if delta < 0 {
                ledger.debit(account, product, magnitude)?;
            }
        }
        Ok(())
    }
}

/// `a * b` with overflow reported as an engine error
#[inline]
pub(crate) fn notional(price: u64, quantity: u64) -> Result<u64, EngineError> {
    price.checked_mul(quantity).ok_or(EngineError::Overflow)
}
