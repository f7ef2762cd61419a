//! Engine configuration: product pairs and their settlement face value.
//!
//! ## Format
//!
//! ```json
//! {
//!   "pairs": [ { "products": [0, 1], "token_price": 10000 } ],
//!   "order_capacity": 1024
//! }
//! ```
//!
//! The complement mapping and token prices are fixed once an engine is built.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::ProductId;

/// Default face value of one complete set
pub const DEFAULT_TOKEN_PRICE: u64 = 10_000;

/// Default per-side slab capacity
pub const DEFAULT_ORDER_CAPACITY: usize = 1024;

/// One complementary pair of products
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairConfig {
    /// The two products; each is the other's complement
    pub products: [u8; 2],

    /// Collateral locked by one unit of each product together
    pub token_price: u64,
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    pub pairs: Vec<PairConfig>,

    #[serde(default = "default_order_capacity")]
    pub order_capacity: usize,
}

fn default_order_capacity() -> usize {
    DEFAULT_ORDER_CAPACITY
}

/// Resolved settings for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSpec {
    pub complement: ProductId,
    pub token_price: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::binary(DEFAULT_TOKEN_PRICE)
    }
}

impl EngineConfig {
    /// A single YES/NO pair on products 0 and 1
    pub fn binary(token_price: u64) -> Self {
        Self {
            pairs: vec![PairConfig {
                products: [0, 1],
                token_price,
            }],
            order_capacity: DEFAULT_ORDER_CAPACITY,
        }
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Validate the pairs and build the per-product table
    ///
    /// # Errors
    ///
    /// - `NoPairs` if no pair is declared
    /// - `SelfComplement` if a pair names the same product twice
    /// - `DuplicateProduct` if a product belongs to two pairs
    /// - `ZeroTokenPrice` if a pair has no face value
    pub fn validate(&self) -> Result<BTreeMap<ProductId, ProductSpec>, ConfigError> {
        if self.pairs.is_empty() {
            return Err(ConfigError::NoPairs);
        }

        let mut products = BTreeMap::new();
        for pair in &self.pairs {
            let [a, b] = pair.products;
            if a == b {
                return Err(ConfigError::SelfComplement(a));
            }
            if pair.token_price == 0 {
                return Err(ConfigError::ZeroTokenPrice(pair.products));
            }
            for (product, complement) in [(a, b), (b, a)] {
                let spec = ProductSpec {
                    complement: ProductId(complement),
                    token_price: pair.token_price,
                };
                if products.insert(ProductId(product), spec).is_some() {
                    return Err(ConfigError::DuplicateProduct(product));
                }
            }
        }
        Ok(products)
    }
}
