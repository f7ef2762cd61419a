//! Order book module.
//!
//! ## Architecture
//!
//! Each product owns an [`OrderBook`] with two [`PriceLevelList`]s:
//!
//! - **Slab-based storage**: orders are never freed, so ids are stable slab keys
//! - **Single linked chain**: price ordering and FIFO ordering share one link pair
//! - **Tombstones**: filled and canceled orders stay readable with `amount == 0`
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert | O(k), k = orders at least as aggressive |
//! | Remove by id | O(1) |
//! | Best order | O(1) |
//!
//! ## Example
//!
//! ```
//! use complement_clob::orderbook::OrderBook;
//! use complement_clob::types::{AccountId, ProductId, Side};
//!
//! let mut book = OrderBook::new(ProductId(0));
//! let maker = AccountId::new(7).unwrap();
//!
//! book.side_mut(Side::Bid).insert(maker, 10_000, 5);
//! book.side_mut(Side::Bid).insert(maker, 11_000, 5);
//!
//! assert_eq!(book.best_bid_price(), Some(11_000));
//! ```

pub mod book;
pub mod list;

pub use book::OrderBook;
pub use list::{Levels, PriceLevelList};
