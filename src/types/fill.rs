//! Fill type representing one matched tranche against a resting order.
//!
//! ## SSZ Serialization
//!
//! Fills are serialized using SSZ for deterministic encoding, so a replay of
//! the same call sequence produces byte-identical fill logs.

use ssz_rs::prelude::*;

use crate::types::ids::{AccountId, OrderId, ProductId};

/// How a resting order was consumed
///
/// Represented as u8 for SSZ compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillKind {
    /// Same-product bid/ask crossing during placement
    Cross,
    /// Complementary bids minted into a complete set
    Mint,
    /// Explicit take of one targeted order
    Take,
}

impl FillKind {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            FillKind::Cross => 0,
            FillKind::Mint => 1,
            FillKind::Take => 2,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FillKind::Cross),
            1 => Some(FillKind::Mint),
            2 => Some(FillKind::Take),
            _ => None,
        }
    }
}

/// A single match between a resting order and the caller.
///
/// ## Terminology
///
/// - **Resting**: the order that was already in the book
/// - **Taker**: the account whose call triggered the match
///
/// The fill always records the resting order's price. For a mint, `product`
/// is the complement product the resting bid was placed on.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Fill {
    /// Engine-wide fill sequence number
    pub sequence: u64,

    /// FillKind as u8 (0=Cross, 1=Mint, 2=Take)
    pub kind_raw: u8,

    /// Product of the resting order
    pub product: u8,

    /// Side of the resting order as u8 (0=Bid, 1=Ask)
    pub resting_side_raw: u8,

    /// Resting order id
    pub resting_order_id: u64,

    /// Resting order's maker
    pub resting_maker: u64,

    /// Account that triggered the match
    pub taker: u64,

    /// Execution price (resting order's price)
    pub price: u64,

    /// Matched quantity
    pub quantity: u64,
}

impl Fill {
    /// Get the fill kind, `None` if `kind_raw` is not a known kind
    pub fn kind(&self) -> Option<FillKind> {
        FillKind::from_u8(self.kind_raw)
    }

    /// Product of the resting order
    pub fn product_id(&self) -> ProductId {
        ProductId(self.product)
    }

    /// Resting order id
    pub fn resting_order(&self) -> Option<OrderId> {
        OrderId::new(self.resting_order_id)
    }

    /// Resting order's maker
    pub fn maker(&self) -> Option<AccountId> {
        AccountId::new(self.resting_maker)
    }

    /// Account that triggered the match
    pub fn taker_account(&self) -> Option<AccountId> {
        AccountId::new(self.taker)
    }

    /// Notional value of this fill at the execution price
    pub fn notional(&self) -> u128 {
        (self.price as u128) * (self.quantity as u128)
    }
}
