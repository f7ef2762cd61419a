//! Order types for the complementary-pair order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs for deterministic encoding.
//! SSZ encoding rules:
//! - Basic types (u64, u8): Direct little-endian encoding
//! - Fixed-size composites: Concatenated little-endian fields
//!
//! The enum-like and optional fields are therefore stored raw (`side_raw`,
//! `maker_raw`, `higher_raw`, `lower_raw`, with `0` meaning "none") and read
//! back through typed accessors.

use ssz_rs::prelude::*;

use crate::types::ids::{AccountId, OrderId, ProductId};

// ============================================================================
// Side enum
// ============================================================================

/// Book side: resting bids or resting asks
///
/// Represented as u8 for SSZ compatibility:
/// - Bid = 0
/// - Ask = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Collateral-backed buy order
    #[default]
    Bid,
    /// Token-backed sell order
    Ask,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Ask),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Whether a resting order at `existing` keeps priority over a new order at `incoming`.
    ///
    /// Bids rank by descending price, asks by ascending price. Equal prices
    /// count as "at least as aggressive" so earlier orders keep FIFO priority.
    #[inline]
    pub fn at_least_as_aggressive(self, existing: u64, incoming: u64) -> bool {
        match self {
            Side::Bid => existing >= incoming,
            Side::Ask => existing <= incoming,
        }
    }

    /// Whether an order on this side at `own` crosses a resting opposite order at `resting`.
    #[inline]
    pub fn crosses(self, own: u64, resting: u64) -> bool {
        match self {
            Side::Bid => resting <= own,
            Side::Ask => resting >= own,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting (or tombstoned) limit order.
///
/// ## Tombstones
///
/// A canceled or fully filled order keeps its slot: `amount == 0`, maker
/// cleared, both links cleared. Its id is never reused.
///
/// ## SSZ Layout
///
/// Fixed-size container: 8+1+1+8+8+8+8+8+8 = 58 bytes.
///
/// ## Example
///
/// ```
/// use complement_clob::types::{AccountId, Order, OrderId, ProductId, Side};
///
/// let maker = AccountId::new(100).unwrap();
/// let id = OrderId::new(1).unwrap();
/// let order = Order::new(id, ProductId(0), Side::Bid, maker, 10_000, 5);
///
/// assert_eq!(order.maker(), Some(maker));
/// assert!(order.higher().is_none() && order.lower().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Order id within its (product, side) list
    pub id: u64,

    /// Product the order trades
    pub product: u8,

    /// Side as u8 (0=Bid, 1=Ask)
    pub side_raw: u8,

    /// Integer unit price
    pub price: u64,

    /// Quantity at placement (after any immediate matching)
    pub quantity: u64,

    /// Remaining unfilled quantity
    pub amount: u64,

    /// Maker account (0 once tombstoned)
    pub maker_raw: u64,

    /// More aggressive neighbor (0 if this is the best order)
    pub higher_raw: u64,

    /// Less aggressive neighbor (0 if this is the worst order)
    pub lower_raw: u64,
}

impl Order {
    /// Create a new, unlinked order
    pub fn new(
        id: OrderId,
        product: ProductId,
        side: Side,
        maker: AccountId,
        price: u64,
        amount: u64,
    ) -> Self {
        Self {
            id: id.get(),
            product: product.get(),
            side_raw: side.to_u8(),
            price,
            quantity: amount,
            amount,
            maker_raw: maker.get(),
            higher_raw: 0,
            lower_raw: 0,
        }
    }

    /// Typed order id
    pub fn order_id(&self) -> Option<OrderId> {
        OrderId::new(self.id)
    }

    /// Product the order trades
    pub fn product_id(&self) -> ProductId {
        ProductId(self.product)
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Bid)
    }

    /// Maker account, `None` once tombstoned
    pub fn maker(&self) -> Option<AccountId> {
        AccountId::new(self.maker_raw)
    }

    /// More aggressive neighbor
    pub fn higher(&self) -> Option<OrderId> {
        OrderId::new(self.higher_raw)
    }

    /// Less aggressive neighbor
    pub fn lower(&self) -> Option<OrderId> {
        OrderId::new(self.lower_raw)
    }

    pub(crate) fn set_higher(&mut self, id: Option<OrderId>) {
        self.higher_raw = OrderId::to_raw(id);
    }

    pub(crate) fn set_lower(&mut self, id: Option<OrderId>) {
        self.lower_raw = OrderId::to_raw(id);
    }

    /// Whether the order is still resting
    pub fn is_live(&self) -> bool {
        self.amount > 0
    }

    /// Get the filled quantity
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.amount)
    }

    /// Fill a portion of this order
    ///
    /// # Returns
    ///
    /// The actual quantity filled (may be less if the order doesn't have enough remaining)
    pub fn fill(&mut self, quantity: u64) -> u64 {
        let actual = quantity.min(self.amount);
        self.amount -= actual;
        actual
    }

    /// Zero the order and clear its maker and links
    pub(crate) fn tombstone(&mut self) {
        self.amount = 0;
        self.maker_raw = 0;
        self.higher_raw = 0;
        self.lower_raw = 0;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
