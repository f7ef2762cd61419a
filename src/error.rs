//! Error types for the matching engine and its configuration.

use thiserror::Error;

use crate::types::{AccountId, OrderId, ProductId};

/// Rejection of an engine call.
///
/// Every variant is raised before any state is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid price: must be greater than zero")]
    InvalidPrice,

    #[error("invalid quantity: must be greater than zero")]
    InvalidQuantity,

    #[error("funds mismatch: required {required}, provided {provided}")]
    FundsMismatch { required: u64, provided: u64 },

    #[error("insufficient tokens: {account} holds {available} of {product}, needs {required}")]
    InsufficientTokenBalance {
        account: AccountId,
        product: ProductId,
        required: u64,
        available: u64,
    },

    #[error("order {order_id} not found on {product}")]
    NotFound { product: ProductId, order_id: OrderId },

    #[error("{caller} is not the maker of order {order_id}")]
    Unauthorized { caller: AccountId, order_id: OrderId },

    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    #[error("insufficient escrow: required {required}, available {available}")]
    InsufficientEscrow { required: u64, available: u64 },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("state encoding failed: {0}")]
    Encoding(String),
}

/// Invalid engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config declares no product pairs")]
    NoPairs,

    #[error("product {0} cannot be its own complement")]
    SelfComplement(u8),

    #[error("product {0} appears in more than one pair")]
    DuplicateProduct(u8),

    #[error("pair {0:?} has a zero token price")]
    ZeroTokenPrice([u8; 2]),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ids_render_alike() {
        let order_id = OrderId::new(3).unwrap();
        let caller = AccountId::new(9).unwrap();

        let missing = EngineError::NotFound { product: ProductId(1), order_id };
        let foreign = EngineError::Unauthorized { caller, order_id };

        assert_eq!(missing.to_string(), "order #3 not found on P1");
        assert_eq!(foreign.to_string(), "acct:9 is not the maker of order #3");
    }
}
