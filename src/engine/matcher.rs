//! Matching engine: placement, complete-set minting, crossing, taking, canceling.
//!
//! ## Placement Flow
//!
//! ```text
//! make_bid: validate -> deposit -> mint vs complement bids -> cross vs asks -> rest residual
//! make_ask: validate -> balance check -> cross vs bids -> rest residual
//! ```
//!
//! Every call plans its effects first (see [`settlement`](super::settlement))
//! and commits only once the whole plan is known to be valid.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::accounting::{Ledger, TokenBalances, Treasury};
use crate::config::{EngineConfig, ProductSpec};
use crate::engine::settlement::{notional, PlannedFill, Settlement};
use crate::error::{ConfigError, EngineError};
use crate::orderbook::OrderBook;
use crate::types::{
    AccountId, Execution, Fill, FillKind, Order, OrderId, PayoutReason, ProductId, Side,
};

/// One tradable product: its fixed pairing plus its book
#[derive(Debug, Clone)]
struct Market {
    spec: ProductSpec,
    book: OrderBook,
}

/// The matching engine context.
///
/// Holds every product's book, the collateral counters and the token
/// ledger. Independent engines share nothing.
#[derive(Debug, Clone)]
pub struct MatchingEngine<T: TokenBalances = Ledger> {
    markets: BTreeMap<ProductId, Market>,
    treasury: Treasury,
    ledger: T,
    fill_sequence: u64,
}

impl MatchingEngine<Ledger> {
    /// Create an engine with an empty in-memory ledger
    ///
    /// # Example
    ///
    /// ```
    /// use complement_clob::{EngineConfig, MatchingEngine};
    ///
    /// let engine = MatchingEngine::new(&EngineConfig::default()).unwrap();
    /// assert_eq!(engine.escrow(), 0);
    /// ```
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_ledger(config, Ledger::new())
    }
}

impl<T: TokenBalances> MatchingEngine<T> {
    /// Create an engine backed by an external token ledger
    pub fn with_ledger(config: &EngineConfig, ledger: T) -> Result<Self, ConfigError> {
        let markets = config
            .validate()?
            .into_iter()
            .map(|(product, spec)| {
                let book = OrderBook::with_capacity(product, config.order_capacity);
                (product, Market { spec, book })
            })
            .collect();

        Ok(Self {
            markets,
            treasury: Treasury::new(),
            ledger,
            fill_sequence: 0,
        })
    }

    // ========================================================================
    // Read Accessors
    // ========================================================================

    /// Configured products in ascending order
    pub fn products(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.markets.keys().copied()
    }

    /// Complement of a product
    pub fn complement(&self, product: ProductId) -> Option<ProductId> {
        self.markets.get(&product).map(|m| m.spec.complement)
    }

    /// Face value of the pair a product belongs to
    pub fn token_price(&self, product: ProductId) -> Option<u64> {
        self.markets.get(&product).map(|m| m.spec.token_price)
    }

    /// A product's book
    pub fn book(&self, product: ProductId) -> Result<&OrderBook, EngineError> {
        self.markets
            .get(&product)
            .map(|m| &m.book)
            .ok_or(EngineError::UnknownProduct(product))
    }

    fn book_mut(&mut self, product: ProductId) -> Result<&mut OrderBook, EngineError> {
        self.markets
            .get_mut(&product)
            .map(|m| &mut m.book)
            .ok_or(EngineError::UnknownProduct(product))
    }

    fn spec(&self, product: ProductId) -> Result<ProductSpec, EngineError> {
        self.markets
            .get(&product)
            .map(|m| m.spec)
            .ok_or(EngineError::UnknownProduct(product))
    }

    /// Most aggressive resting bid
    pub fn best_bid_id(&self, product: ProductId) -> Option<OrderId> {
        self.book(product).ok()?.bids().peek_best()
    }

    /// Most aggressive resting ask
    pub fn best_ask_id(&self, product: ProductId) -> Option<OrderId> {
        self.book(product).ok()?.asks().peek_best()
    }

    /// Id the next resting bid will receive
    pub fn bid_head(&self, product: ProductId) -> Option<OrderId> {
        Some(self.book(product).ok()?.bids().next_id())
    }

    /// Id the next resting ask will receive
    pub fn ask_head(&self, product: ProductId) -> Option<OrderId> {
        Some(self.book(product).ok()?.asks().next_id())
    }

    /// Bid detail, tombstones included
    pub fn bids(&self, product: ProductId, id: OrderId) -> Option<&Order> {
        self.book(product).ok()?.bids().get(id)
    }

    /// Ask detail, tombstones included
    pub fn asks(&self, product: ProductId, id: OrderId) -> Option<&Order> {
        self.book(product).ok()?.asks().get(id)
    }

    /// Settled token balance
    pub fn ledger(&self, account: AccountId, product: ProductId) -> u64 {
        self.ledger.balance_of(account, product)
    }

    /// The token ledger, for the host's issuance and transfer paths
    pub fn token_ledger(&self) -> &T {
        &self.ledger
    }

    /// The token ledger (mutable)
    pub fn token_ledger_mut(&mut self) -> &mut T {
        &mut self.ledger
    }

    /// Collateral locked behind resting bids
    pub fn escrow(&self) -> u64 {
        self.treasury.escrow()
    }

    /// Collateral backing minted complete sets
    pub fn prize_pool(&self) -> u64 {
        self.treasury.prize_pool()
    }

    /// All native value currently held by the engine
    pub fn custodied_funds(&self) -> u64 {
        self.treasury.custody()
    }

    /// The collateral counters
    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Place a collateral-backed bid.
    ///
    /// `payment` must equal `price * amount` exactly. The bid first mints
    /// complete sets against resting bids on the complement product, then
    /// crosses resting asks on its own product. Any residual rests.
    ///
    /// # Errors
    ///
    /// `InvalidPrice`, `InvalidQuantity`, `FundsMismatch`, `UnknownProduct`,
    /// plus `InsufficientEscrow` / `InsufficientTokenBalance` if a resting
    /// counterparty cannot be settled.
    pub fn make_bid(
        &mut self,
        caller: AccountId,
        product: ProductId,
        price: u64,
        amount: u64,
        payment: u64,
    ) -> Result<Execution, EngineError> {
        validate_order(price, amount)?;
        let spec = self.spec(product)?;
        let required = notional(price, amount)?;
        if payment != required {
            return Err(EngineError::FundsMismatch { required, provided: payment });
        }
        debug!(%caller, %product, price, amount, "make_bid");

        let mut plan = Settlement::new(self.treasury);
        plan.treasury.deposit(payment)?;

        let unminted = self.plan_mint(&mut plan, caller, product, spec, amount)?;
        let (remaining, improvement) = self.plan_cross(&mut plan, caller, product, Side::Bid, price, unminted)?;

        // Excess collateral stays escrowed behind a resting residual
        if remaining == 0 {
            plan.release(caller, improvement, PayoutReason::PriceImprovement)?;
        }

        self.finish(plan, caller, product, Side::Bid, price, remaining)
    }

    /// Place a token-backed ask.
    ///
    /// The caller must hold at least `amount` of the product. Tokens are
    /// not locked; they are debited as fills occur. Asks only cross resting
    /// bids on the same product.
    ///
    /// # Errors
    ///
    /// `InvalidPrice`, `InvalidQuantity`, `UnknownProduct`,
    /// `InsufficientTokenBalance`, `InsufficientEscrow`.
    pub fn make_ask(
        &mut self,
        caller: AccountId,
        product: ProductId,
        price: u64,
        amount: u64,
    ) -> Result<Execution, EngineError> {
        validate_order(price, amount)?;
        self.spec(product)?;
        let available = self.ledger.balance_of(caller, product);
        if available < amount {
            return Err(EngineError::InsufficientTokenBalance {
                account: caller,
                product,
                required: amount,
                available,
            });
        }
        debug!(%caller, %product, price, amount, "make_ask");

        let mut plan = Settlement::new(self.treasury);
        let (remaining, _) = self.plan_cross(&mut plan, caller, product, Side::Ask, price, amount)?;

        self.finish(plan, caller, product, Side::Ask, price, remaining)
    }

    /// Mint complete sets against the complement's resting bids.
    ///
    /// Moves `matched * token_price` from escrow to the prize pool per
    /// tranche regardless of the two bid prices.
    fn plan_mint(
        &self,
        plan: &mut Settlement,
        caller: AccountId,
        product: ProductId,
        spec: ProductSpec,
        amount: u64,
    ) -> Result<u64, EngineError> {
        let complement_bids = self.book(spec.complement)?.bids();
        let mut remaining = amount;
        let mut cursor = complement_bids.peek_best();

        while remaining > 0 {
            let Some(id) = cursor else { break };
            let resting = complement_bids.get_live(id)?;
            let maker = maker_of(resting, spec.complement, id)?;
            let matched = remaining.min(resting.amount);

            plan.treasury.mint(notional(spec.token_price, matched)?)?;
            plan.credit(caller, product, matched);
            plan.credit(maker, spec.complement, matched);
            plan.fills.push(PlannedFill {
                kind: FillKind::Mint,
                product: spec.complement,
                side: Side::Bid,
                order_id: id,
                maker,
                price: resting.price,
                quantity: matched,
            });

            remaining -= matched;
            cursor = resting.lower();
        }
        Ok(remaining)
    }

    /// Cross the incoming order against the opposite side of its own book.
    ///
    /// Each tranche executes at the resting order's price.
    ///
    /// # Returns
    ///
    /// `(remaining, improvement)`, where `improvement` is the collateral an
    /// incoming bid locked above the asks it filled. It is always 0 for asks.
    fn plan_cross(
        &self,
        plan: &mut Settlement,
        caller: AccountId,
        product: ProductId,
        side: Side,
        price: u64,
        amount: u64,
    ) -> Result<(u64, u64), EngineError> {
        let opposite = self.book(product)?.side(side.opposite());
        let mut remaining = amount;
        let mut improvement = 0u64;
        let mut cursor = opposite.peek_best();

        while remaining > 0 {
            let Some(id) = cursor else { break };
            let resting = opposite.get_live(id)?;
            if !side.crosses(price, resting.price) {
                break;
            }
            let maker = maker_of(resting, product, id)?;
            let matched = remaining.min(resting.amount);
            let proceeds = notional(resting.price, matched)?;

            match side {
                Side::Bid => {
                    let gap = notional(price - resting.price, matched)?;
                    improvement = improvement.checked_add(gap).ok_or(EngineError::Overflow)?;
                    plan.release(maker, proceeds, PayoutReason::Proceeds)?;
                    plan.credit(caller, product, matched);
                    plan.debit(maker, product, matched);
                }
                Side::Ask => {
                    plan.release(caller, proceeds, PayoutReason::Proceeds)?;
                    plan.credit(maker, product, matched);
                    plan.debit(caller, product, matched);
                }
            }
            plan.fills.push(PlannedFill {
                kind: FillKind::Cross,
                product,
                side: side.opposite(),
                order_id: id,
                maker,
                price: resting.price,
                quantity: matched,
            });

            remaining -= matched;
            cursor = resting.lower();
        }
        Ok((remaining, improvement))
    }

    /// Verify and commit a placement plan, then rest the residual
    fn finish(
        &mut self,
        plan: Settlement,
        caller: AccountId,
        product: ProductId,
        side: Side,
        price: u64,
        remaining: u64,
    ) -> Result<Execution, EngineError> {
        plan.verify(&self.ledger)?;
        let mut execution = self.commit(plan, caller)?;

        if remaining > 0 {
            let id = self.book_mut(product)?.side_mut(side).insert(caller, price, remaining);
            debug!(%product, ?side, %id, price, remaining, "order resting");
            execution.order_id = Some(id);
            execution.remaining = remaining;
        }
        Ok(execution)
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Cancel a resting bid and refund its remaining collateral
    ///
    /// # Errors
    ///
    /// `NotFound` if the order is absent or tombstoned, `Unauthorized` if
    /// the caller is not its maker.
    pub fn cancel_bid(
        &mut self,
        caller: AccountId,
        product: ProductId,
        order_id: OrderId,
    ) -> Result<Execution, EngineError> {
        self.cancel(caller, product, Side::Bid, order_id)
    }

    /// Cancel a resting ask. No value moves: asks lock nothing.
    pub fn cancel_ask(
        &mut self,
        caller: AccountId,
        product: ProductId,
        order_id: OrderId,
    ) -> Result<Execution, EngineError> {
        self.cancel(caller, product, Side::Ask, order_id)
    }

    fn cancel(
        &mut self,
        caller: AccountId,
        product: ProductId,
        side: Side,
        order_id: OrderId,
    ) -> Result<Execution, EngineError> {
        let order = self.book(product)?.side(side).get_live(order_id)?;
        if order.maker() != Some(caller) {
            return Err(EngineError::Unauthorized { caller, order_id });
        }

        let mut plan = Settlement::new(self.treasury);
        if side == Side::Bid {
            let refund = notional(order.price, order.amount)?;
            plan.release(caller, refund, PayoutReason::Refund)?;
        }
        debug!(%caller, %product, ?side, %order_id, "cancel");

        let execution = self.commit(plan, caller)?;
        self.book_mut(product)?.side_mut(side).remove(order_id)?;
        Ok(execution)
    }

    // ========================================================================
    // Explicit Takes
    // ========================================================================

    /// Sell into one specific resting bid, consuming it entirely.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent, `InsufficientTokenBalance` if the caller holds
    /// fewer than `order.amount` tokens.
    pub fn take_bid(
        &mut self,
        caller: AccountId,
        product: ProductId,
        order_id: OrderId,
    ) -> Result<Execution, EngineError> {
        let order = self.book(product)?.bids().get_live(order_id)?;
        let maker = maker_of(order, product, order_id)?;
        let (price, amount) = (order.price, order.amount);

        let available = self.ledger.balance_of(caller, product);
        if available < amount {
            return Err(EngineError::InsufficientTokenBalance {
                account: caller,
                product,
                required: amount,
                available,
            });
        }
        debug!(%caller, %product, %order_id, amount, "take_bid");

        let mut plan = Settlement::new(self.treasury);
        plan.release(caller, notional(price, amount)?, PayoutReason::Proceeds)?;
        plan.debit(caller, product, amount);
        plan.credit(maker, product, amount);
        plan.fills.push(PlannedFill {
            kind: FillKind::Take,
            product,
            side: Side::Bid,
            order_id,
            maker,
            price,
            quantity: amount,
        });

        plan.verify(&self.ledger)?;
        self.commit(plan, caller)
    }

    /// Buy one specific resting ask outright, consuming it entirely.
    ///
    /// `payment` must equal `order.amount * order.price` and is forwarded
    /// to the maker without touching escrow.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent, `FundsMismatch` on a wrong payment,
    /// `InsufficientTokenBalance` if the maker no longer holds the tokens.
    pub fn take_ask(
        &mut self,
        caller: AccountId,
        product: ProductId,
        order_id: OrderId,
        payment: u64,
    ) -> Result<Execution, EngineError> {
        let order = self.book(product)?.asks().get_live(order_id)?;
        let maker = maker_of(order, product, order_id)?;
        let (price, amount) = (order.price, order.amount);

        let required = notional(price, amount)?;
        if payment != required {
            return Err(EngineError::FundsMismatch { required, provided: payment });
        }
        debug!(%caller, %product, %order_id, amount, "take_ask");

        let mut plan = Settlement::new(self.treasury);
        plan.forward(maker, payment, PayoutReason::Proceeds);
        plan.debit(maker, product, amount);
        plan.credit(caller, product, amount);
        plan.fills.push(PlannedFill {
            kind: FillKind::Take,
            product,
            side: Side::Ask,
            order_id,
            maker,
            price,
            quantity: amount,
        });

        plan.verify(&self.ledger)?;
        self.commit(plan, caller)
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Apply a verified plan to the ledger, books and counters
    fn commit(&mut self, plan: Settlement, taker: AccountId) -> Result<Execution, EngineError> {
        plan.apply_ledger(&mut self.ledger)?;

        let mut fills = Vec::with_capacity(plan.fills.len());
        for planned in &plan.fills {
            self.book_mut(planned.product)?
                .side_mut(planned.side)
                .fill(planned.order_id, planned.quantity)?;

            self.fill_sequence += 1;
            trace!(
                sequence = self.fill_sequence,
                kind = ?planned.kind,
                product = %planned.product,
                order_id = %planned.order_id,
                price = planned.price,
                quantity = planned.quantity,
                "fill"
            );
            fills.push(Fill {
                sequence: self.fill_sequence,
                kind_raw: planned.kind.to_u8(),
                product: planned.product.get(),
                resting_side_raw: planned.side.to_u8(),
                resting_order_id: planned.order_id.get(),
                resting_maker: planned.maker.get(),
                taker: taker.get(),
                price: planned.price,
                quantity: planned.quantity,
            });
        }

        self.treasury = plan.treasury;
        debug_assert!(self.treasury.is_balanced());

        Ok(Execution {
            order_id: None,
            remaining: 0,
            fills,
            payouts: plan.payouts,
        })
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over every book's SSZ-encoded orders and the treasury counters.
    ///
    /// Tombstones are included, so two engines agree only if they saw the
    /// same history of resting orders.
    pub fn state_root(&self) -> Result<[u8; 32], EngineError> {
        let mut hasher = Sha256::new();

        for (product, market) in &self.markets {
            hasher.update([product.get()]);
            for side in [Side::Bid, Side::Ask] {
                for order in market.book.side(side).all_orders() {
                    let bytes = ssz_rs::serialize(order)
                        .map_err(|e| EngineError::Encoding(format!("{e:?}")))?;
                    hasher.update(&bytes);
                }
            }
        }
        hasher.update(self.treasury.escrow().to_le_bytes());
        hasher.update(self.treasury.prize_pool().to_le_bytes());
        hasher.update(self.treasury.custody().to_le_bytes());

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> Result<String, EngineError> {
        Ok(hex::encode(self.state_root()?))
    }
}

fn validate_order(price: u64, amount: u64) -> Result<(), EngineError> {
    if price == 0 {
        return Err(EngineError::InvalidPrice);
    }
    if amount == 0 {
        return Err(EngineError::InvalidQuantity);
    }
    Ok(())
}

/// Maker of a live order; a live order without one is unreachable
fn maker_of(order: &Order, product: ProductId, order_id: OrderId) -> Result<AccountId, EngineError> {
    order.maker().ok_or(EngineError::NotFound { product, order_id })
}

// ============================================================================
// Unit Tests
// ============================================================================
