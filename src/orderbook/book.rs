//! Per-product order book: one bid list and one ask list.

use crate::orderbook::PriceLevelList;
use crate::types::{ProductId, Side};

/// Both sides of one product's book.
///
/// Each side owns its own id sequence, so bid #1 and ask #1 are distinct orders.
#[derive(Debug, Clone)]
pub struct OrderBook {
    product: ProductId,
    bids: PriceLevelList,
    asks: PriceLevelList,
}

impl OrderBook {
    /// Create an empty book
    pub fn new(product: ProductId) -> Self {
        Self::with_capacity(product, 0)
    }

    /// Create an empty book with pre-allocated slots on each side
    pub fn with_capacity(product: ProductId, capacity: usize) -> Self {
        Self {
            product,
            bids: PriceLevelList::with_capacity(product, Side::Bid, capacity),
            asks: PriceLevelList::with_capacity(product, Side::Ask, capacity),
        }
    }

    #[inline]
    pub fn product(&self) -> ProductId {
        self.product
    }

    #[inline]
    pub fn bids(&self) -> &PriceLevelList {
        &self.bids
    }

    #[inline]
    pub fn asks(&self) -> &PriceLevelList {
        &self.asks
    }

    /// One side of the book
    #[inline]
    pub fn side(&self, side: Side) -> &PriceLevelList {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// One side of the book (mutable)
    #[inline]
    pub fn side_mut(&mut self, side: Side) -> &mut PriceLevelList {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Best bid price, if any bid rests
    pub fn best_bid_price(&self) -> Option<u64> {
        self.best_price(Side::Bid)
    }

    /// Best ask price, if any ask rests
    pub fn best_ask_price(&self) -> Option<u64> {
        self.best_price(Side::Ask)
    }

    fn best_price(&self, side: Side) -> Option<u64> {
        let list = self.side(side);
        list.peek_best()
            .and_then(|id| list.get(id))
            .map(|order| order.price)
    }

    /// Spread between best ask and best bid
    ///
    /// `None` if either side is empty or the book is locked/crossed.
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }
}
