//! Thread-safe engine handle.
//!
//! Minting touches two products' books and the global counters in one call,
//! so every operation runs under a single lock covering the whole engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::accounting::{Ledger, TokenBalances};
use crate::engine::MatchingEngine;
use crate::error::EngineError;
use crate::types::{AccountId, Execution, OrderId, ProductId};

/// Cloneable handle serializing all callers onto one engine
#[derive(Debug)]
pub struct SharedEngine<T: TokenBalances = Ledger> {
    inner: Arc<Mutex<MatchingEngine<T>>>,
}

impl<T: TokenBalances> Clone for SharedEngine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: TokenBalances> SharedEngine<T> {
    pub fn new(engine: MatchingEngine<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MatchingEngine<T>> {
        // Calls commit all-or-nothing, so a poisoned engine is still consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut MatchingEngine<T>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn make_bid(
        &self,
        caller: AccountId,
        product: ProductId,
        price: u64,
        amount: u64,
        payment: u64,
    ) -> Result<Execution, EngineError> {
        self.lock().make_bid(caller, product, price, amount, payment)
    }

    pub fn make_ask(
        &self,
        caller: AccountId,
        product: ProductId,
        price: u64,
        amount: u64,
    ) -> Result<Execution, EngineError> {
        self.lock().make_ask(caller, product, price, amount)
    }

    pub fn cancel_bid(&self, caller: AccountId, product: ProductId, order_id: OrderId) -> Result<Execution, EngineError> {
        self.lock().cancel_bid(caller, product, order_id)
    }

    pub fn cancel_ask(&self, caller: AccountId, product: ProductId, order_id: OrderId) -> Result<Execution, EngineError> {
        self.lock().cancel_ask(caller, product, order_id)
    }

    pub fn take_bid(&self, caller: AccountId, product: ProductId, order_id: OrderId) -> Result<Execution, EngineError> {
        self.lock().take_bid(caller, product, order_id)
    }

    pub fn take_ask(
        &self,
        caller: AccountId,
        product: ProductId,
        order_id: OrderId,
        payment: u64,
    ) -> Result<Execution, EngineError> {
        self.lock().take_ask(caller, product, order_id, payment)
    }
}
