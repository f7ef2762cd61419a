//! Shared helpers for integration tests.

#![allow(dead_code)]

use complement_clob::{AccountId, MatchingEngine, OrderId, ProductId, Side};

pub const YES: ProductId = ProductId(0);
pub const NO: ProductId = ProductId(1);

pub fn account(raw: u64) -> AccountId {
    AccountId::new(raw).expect("non-zero account")
}

pub fn id(raw: u64) -> OrderId {
    OrderId::new(raw).expect("non-zero id")
}

/// Walk one side best-to-worst and back again, checking links and ordering.
pub fn assert_list_consistent(engine: &MatchingEngine, product: ProductId, side: Side) {
    let list = engine.book(product).expect("known product").side(side);

    let forward: Vec<u64> = list.iter().map(|o| o.id).collect();
    assert_eq!(forward.len(), list.depth(), "{product} {side:?}: walk misses live orders");

    let live = list.all_orders().filter(|o| o.is_live()).count();
    assert_eq!(live, list.depth(), "{product} {side:?}: depth disagrees with live orders");

    let mut backward = Vec::new();
    let mut cursor = forward.last().copied().and_then(OrderId::new);
    while let Some(current) = cursor {
        backward.push(current.get());
        cursor = list.get(current).expect("linked order exists").higher();
    }
    backward.reverse();
    assert_eq!(forward, backward, "{product} {side:?}: backward walk diverges");

    let orders: Vec<_> = list.iter().collect();
    for pair in orders.windows(2) {
        assert!(
            side.at_least_as_aggressive(pair[0].price, pair[1].price),
            "{product} {side:?}: {} before {} breaks price order",
            pair[0].price,
            pair[1].price
        );
        if pair[0].price == pair[1].price {
            assert!(pair[0].id < pair[1].id, "{product} {side:?}: FIFO broken");
        }
    }

    for order in list.all_orders().filter(|o| !o.is_live()) {
        assert!(order.maker().is_none());
        assert!(order.higher().is_none() && order.lower().is_none());
    }
}

/// Conservation plus list consistency on every book
pub fn assert_invariants(engine: &MatchingEngine) {
    assert!(
        engine.treasury().is_balanced(),
        "custody {} != escrow {} + prize {}",
        engine.custodied_funds(),
        engine.escrow(),
        engine.prize_pool()
    );
    let products: Vec<_> = engine.products().collect();
    for product in products {
        assert_list_consistent(engine, product, Side::Bid);
        assert_list_consistent(engine, product, Side::Ask);
    }
}
