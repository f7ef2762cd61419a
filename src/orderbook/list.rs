//! Price-ordered doubly-linked list of resting orders for one (product, side).
//!
//! ## Design
//!
//! One link pair (`higher` / `lower`) serves both as price ordering and as
//! FIFO ordering among equal prices:
//!
//! ```text
//! best (most aggressive) <-> ... <-> [p, older] <-> [p, newer] <-> ... <-> worst
//! ```
//!
//! - Bids: descending price. Asks: ascending price.
//! - Insertion walks from `best` past every order at least as aggressive as
//!   the new one, so ties queue behind existing orders.
//! - Removal is O(1) given the id.
//!
//! ## Slab Integration
//!
//! Orders live in a `Slab<Order>`. Tombstoned orders are never removed from
//! the slab, so keys are handed out sequentially and `id == key + 1`.

use slab::Slab;

use crate::error::EngineError;
use crate::types::{AccountId, Order, OrderId, ProductId, Side};

/// Sorted resting orders for one side of one product's book.
#[derive(Debug, Clone)]
pub struct PriceLevelList {
    product: ProductId,
    side: Side,

    /// Every order ever inserted, tombstones included
    orders: Slab<Order>,

    /// Most aggressive live order
    best: Option<OrderId>,

    /// Number of live orders
    live: usize,
}

impl PriceLevelList {
    /// Create an empty list
    pub fn new(product: ProductId, side: Side) -> Self {
        Self::with_capacity(product, side, 0)
    }

    /// Create an empty list with pre-allocated order slots
    pub fn with_capacity(product: ProductId, side: Side, capacity: usize) -> Self {
        Self {
            product,
            side,
            orders: Slab::with_capacity(capacity),
            best: None,
            live: 0,
        }
    }

    #[inline]
    pub fn product(&self) -> ProductId {
        self.product
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Most aggressive live order, O(1)
    #[inline]
    pub fn peek_best(&self) -> Option<OrderId> {
        self.best
    }

    /// Id the next inserted order will receive
    #[inline]
    pub fn next_id(&self) -> OrderId {
        OrderId::from_key(self.orders.vacant_key())
    }

    /// Number of live orders
    #[inline]
    pub fn depth(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Look up an order (live or tombstoned)
    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id.key())
    }

    /// Look up a live order
    pub fn get_live(&self, id: OrderId) -> Result<&Order, EngineError> {
        self.get(id)
            .filter(|order| order.is_live())
            .ok_or(EngineError::NotFound {
                product: self.product,
                order_id: id,
            })
    }

    /// Store a new order and link it by price-time priority.
    ///
    /// # Returns
    ///
    /// The freshly allocated id
    pub fn insert(&mut self, maker: AccountId, price: u64, amount: u64) -> OrderId {
        let id = self.next_id();
        let key = self
            .orders
            .insert(Order::new(id, self.product, self.side, maker, price, amount));
        debug_assert_eq!(key, id.key());

        self.link(id, price);
        self.live += 1;
        id
    }

    /// Splice a stored order into the chain.
    ///
    /// Walks from `best` over every order at least as aggressive as `price`
    /// and links the new order right after the last of them.
    fn link(&mut self, id: OrderId, price: u64) {
        let mut higher = None;
        let mut cursor = self.best;

        while let Some(current) = cursor {
            let order = &self.orders[current.key()];
            if !self.side.at_least_as_aggressive(order.price, price) {
                break;
            }
            higher = Some(current);
            cursor = order.lower();
        }
        let lower = cursor;

        let node = &mut self.orders[id.key()];
        node.set_higher(higher);
        node.set_lower(lower);

        match higher {
            Some(h) => self.orders[h.key()].set_lower(Some(id)),
            None => self.best = Some(id),
        }
        if let Some(l) = lower {
            self.orders[l.key()].set_higher(Some(id));
        }
    }

    /// Unlink a live order and tombstone its slot.
    ///
    /// # Returns
    ///
    /// The order as it was before tombstoning
    ///
    /// # Errors
    ///
    /// `NotFound` if the id was never allocated or is no longer linked
    pub fn remove(&mut self, id: OrderId) -> Result<Order, EngineError> {
        self.get_live(id)?;
        self.splice_out(id);
        let node = &mut self.orders[id.key()];
        let snapshot = node.clone();
        node.tombstone();
        Ok(snapshot)
    }

    /// Fill part of a live order, retiring it when nothing remains.
    ///
    /// # Returns
    ///
    /// Quantity still resting afterwards
    pub fn fill(&mut self, id: OrderId, quantity: u64) -> Result<u64, EngineError> {
        self.get_live(id)?;
        let remaining = {
            let node = &mut self.orders[id.key()];
            node.fill(quantity);
            node.amount
        };
        if remaining == 0 {
            self.splice_out(id);
            self.orders[id.key()].tombstone();
        }
        Ok(remaining)
    }

    /// Relink an order's neighbors to each other and clear its own links
    fn splice_out(&mut self, id: OrderId) {
        let (higher, lower) = {
            let order = &self.orders[id.key()];
            (order.higher(), order.lower())
        };

        match higher {
            Some(h) => self.orders[h.key()].set_lower(lower),
            None => self.best = lower,
        }
        if let Some(l) = lower {
            self.orders[l.key()].set_higher(higher);
        }

        let node = &mut self.orders[id.key()];
        node.set_higher(None);
        node.set_lower(None);
        self.live -= 1;
    }

    /// Walk live orders from best to worst
    pub fn iter(&self) -> Levels<'_> {
        Levels {
            list: self,
            cursor: self.best,
        }
    }

    /// Every stored order in id order, tombstones included
    pub fn all_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().map(|(_, order)| order)
    }
}

/// Iterator over live orders following `lower` links
pub struct Levels<'a> {
    list: &'a PriceLevelList,
    cursor: Option<OrderId>,
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let order = self.list.get(self.cursor?)?;
        self.cursor = order.lower();
        Some(order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
