//! Identifier types.
//!
//! ## Sentinels
//!
//! Order ids and account ids are backed by `NonZeroU64`. The raw value `0`
//! is reserved for "no order" / "null account" and only ever appears inside
//! the SSZ-encoded [`Order`](crate::types::Order) fields; every public API
//! surfaces it as `Option<OrderId>` / `Option<AccountId>` instead.

use std::fmt;
use std::num::NonZeroU64;

/// A tradable product (one side of a complementary pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProductId(pub u8);

impl ProductId {
    /// Raw product number
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Identifier of an order within one (product, side) list.
///
/// Ids start at 1 and are allocated only when an order actually rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(NonZeroU64);

impl OrderId {
    /// Wrap a raw id. Returns `None` for the reserved value `0`.
    ///
    /// # Example
    ///
    /// ```
    /// use complement_clob::types::OrderId;
    ///
    /// assert!(OrderId::new(0).is_none());
    /// assert_eq!(OrderId::new(7).map(OrderId::get), Some(7));
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Raw id value
    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Raw encoding of an optional id (`0` for none)
    #[inline]
    pub fn to_raw(id: Option<Self>) -> u64 {
        id.map_or(0, Self::get)
    }

    /// Slab key backing this id
    #[inline]
    pub(crate) fn key(self) -> usize {
        (self.get() - 1) as usize
    }

    /// Id stored under a slab key
    #[inline]
    pub(crate) fn from_key(key: usize) -> Self {
        Self(NonZeroU64::MIN.saturating_add(key as u64))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An account holding tokens and paying collateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(NonZeroU64);

impl AccountId {
    /// Wrap a raw account number. Returns `None` for the null account `0`.
    #[inline]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Raw account number
    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Raw encoding of an optional account (`0` for the null account)
    #[inline]
    pub fn to_raw(account: Option<Self>) -> u64 {
        account.map_or(0, Self::get)
    }
}

impl From<NonZeroU64> for AccountId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", self.0)
    }
}
