//! Settled token balances per (account, product).
//!
//! Token issuance and transfers belong to the host; the engine only reads
//! balances and applies the credits/debits produced by matching.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::types::{AccountId, ProductId};

/// Token balance collaborator consumed by the engine
pub trait TokenBalances {
    /// Settled quantity of `product` held by `account`
    fn balance_of(&self, account: AccountId, product: ProductId) -> u64;

    /// Add tokens to an account
    fn credit(&mut self, account: AccountId, product: ProductId, amount: u64) -> Result<(), EngineError>;

    /// Remove tokens from an account
    ///
    /// # Errors
    ///
    /// `InsufficientTokenBalance` if the account holds less than `amount`
    fn debit(&mut self, account: AccountId, product: ProductId, amount: u64) -> Result<(), EngineError>;
}

/// In-memory ledger
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<(AccountId, ProductId), u64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances of one product
    pub fn supply(&self, product: ProductId) -> u64 {
        self.balances
            .iter()
            .filter(|((_, p), _)| *p == product)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl TokenBalances for Ledger {
    fn balance_of(&self, account: AccountId, product: ProductId) -> u64 {
        self.balances.get(&(account, product)).copied().unwrap_or(0)
    }

    fn credit(&mut self, account: AccountId, product: ProductId, amount: u64) -> Result<(), EngineError> {
        let balance = self.balances.entry((account, product)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(EngineError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, account: AccountId, product: ProductId, amount: u64) -> Result<(), EngineError> {
        let available = self.balance_of(account, product);
        let remaining = available
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientTokenBalance {
                account,
                product,
                required: amount,
                available,
            })?;
        if remaining == 0 {
            self.balances.remove(&(account, product));
        } else {
            self.balances.insert((account, product), remaining);
        }
        Ok(())
    }
}
