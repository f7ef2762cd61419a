//! Native collateral counters.
//!
//! - `escrow`: collateral locked behind resting bids
//! - `prize_pool`: collateral backing minted complete sets
//! - `custody`: everything the engine currently holds
//!
//! Conservation: `custody == escrow + prize_pool` after every call.
//! `Treasury` is `Copy` so a call can stage its changes on a copy and
//! commit by assignment.

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Treasury {
    escrow: u64,
    prize_pool: u64,
    custody: u64,
}

impl Treasury {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn escrow(&self) -> u64 {
        self.escrow
    }

    #[inline]
    pub fn prize_pool(&self) -> u64 {
        self.prize_pool
    }

    #[inline]
    pub fn custody(&self) -> u64 {
        self.custody
    }

    /// Whether custodied funds equal escrow plus prize pool
    pub fn is_balanced(&self) -> bool {
        self.escrow.checked_add(self.prize_pool) == Some(self.custody)
    }

    /// Accept a bid payment into escrow
    pub fn deposit(&mut self, amount: u64) -> Result<(), EngineError> {
        self.escrow = self.escrow.checked_add(amount).ok_or(EngineError::Overflow)?;
        self.custody = self.custody.checked_add(amount).ok_or(EngineError::Overflow)?;
        Ok(())
    }

    /// Move collateral from escrow into the prize pool
    pub fn mint(&mut self, amount: u64) -> Result<(), EngineError> {
        self.take_escrow(amount)?;
        self.prize_pool = self.prize_pool.checked_add(amount).ok_or(EngineError::Overflow)?;
        Ok(())
    }

    /// Pay collateral out of escrow to an account
    pub fn release(&mut self, amount: u64) -> Result<(), EngineError> {
        self.take_escrow(amount)?;
        // custody >= escrow always holds, so this cannot underflow while balanced
        self.custody = self.custody.checked_sub(amount).ok_or(EngineError::Overflow)?;
        Ok(())
    }

    fn take_escrow(&mut self, amount: u64) -> Result<(), EngineError> {
        self.escrow = self
            .escrow
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientEscrow {
                required: amount,
                available: self.escrow,
            })?;
        Ok(())
    }
}
