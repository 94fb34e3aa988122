//! Single-symbol order book: bids and asks, price-time priority.
//!
//! Each side is a hash map from price to a FIFO level; price ordering is
//! recovered by sorting the keys on demand. Best bid is the highest price,
//! best ask the lowest. Taking liquidity (used by [`crate::matching`]) updates
//! resting orders in place and drops drained orders and levels.

use crate::types::{Order, Side};
use serde::Serialize;
use std::collections::HashMap;

/// FIFO queue of resting orders sharing one price.
#[derive(Clone, Debug, Default)]
pub struct PriceLevel {
    orders: Vec<Order>,
}

impl PriceLevel {
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Total remaining quantity queued at this price.
    pub fn remaining(&self) -> i64 {
        self.orders.iter().map(|o| o.quantity).sum()
    }
}

/// One row of an aggregated depth snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub price: i64,
    pub quantity: i64,
}

/// Result of consuming liquidity from one resting order.
#[derive(Clone, Debug)]
pub struct Fill {
    pub maker_id: String,
    pub price: i64,
    pub quantity: i64,
    /// True if the resting order drained and was removed from the book.
    pub maker_fully_filled: bool,
}

/// Single-symbol order book.
#[derive(Debug, Default)]
pub struct OrderBook {
    symbol: String,
    bids: HashMap<i64, PriceLevel>,
    asks: HashMap<i64, PriceLevel>,
    /// Resting order id -> (side, price) for cancel and lookup.
    ids: HashMap<String, (Side, i64)>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: HashMap::new(),
            asks: HashMap::new(),
            ids: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    fn levels(&self, side: Side) -> &HashMap<i64, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Appends a limit remainder to the FIFO at its price, creating the level
    /// if absent. A re-add after a cancel goes to the tail like any arrival.
    pub fn add_resting(&mut self, order: Order) {
        self.ids
            .insert(order.id.clone(), (order.side, order.price));
        let side_map = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        side_map.entry(order.price).or_default().orders.push(order);
    }

    /// Removes a resting order by id. Returns the removed order, or `None` if
    /// the id is unknown.
    pub fn cancel(&mut self, order_id: &str) -> Option<Order> {
        let (side, price) = self.ids.remove(order_id)?;
        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = side_map.get_mut(&price)?;
        let pos = level.orders.iter().position(|o| o.id == order_id)?;
        let order = level.orders.remove(pos);
        if level.orders.is_empty() {
            side_map.remove(&price);
        }
        Some(order)
    }

    /// Looks up a resting order by id.
    pub fn get(&self, order_id: &str) -> Option<&Order> {
        let (side, price) = self.ids.get(order_id)?;
        self.levels(*side)
            .get(price)?
            .orders
            .iter()
            .find(|o| o.id == order_id)
    }

    /// Sum of remaining quantity across every level of one side, regardless
    /// of price. Used for the market-order liquidity precondition.
    pub fn available_liquidity(&self, side: Side) -> i64 {
        self.levels(side).values().map(PriceLevel::remaining).sum()
    }

    /// Takes up to `quantity` from the ask side in ascending price order,
    /// stopping at `price_limit`. Consumes each level head-first.
    pub fn take_from_asks(&mut self, price_limit: i64, quantity: i64) -> Vec<Fill> {
        let mut prices: Vec<i64> = self.asks.keys().copied().collect();
        prices.sort_unstable();
        self.take(prices, price_limit, quantity, Side::Sell)
    }

    /// Takes up to `quantity` from the bid side in descending price order,
    /// stopping at `price_limit`.
    pub fn take_from_bids(&mut self, price_limit: i64, quantity: i64) -> Vec<Fill> {
        let mut prices: Vec<i64> = self.bids.keys().copied().collect();
        prices.sort_unstable_by(|a, b| b.cmp(a));
        self.take(prices, price_limit, quantity, Side::Buy)
    }

    fn take(
        &mut self,
        prices: Vec<i64>,
        price_limit: i64,
        mut quantity: i64,
        maker_side: Side,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();
        for price in prices {
            let beyond_limit = match maker_side {
                Side::Sell => price > price_limit,
                Side::Buy => price < price_limit,
            };
            if beyond_limit || quantity == 0 {
                break;
            }
            let side_map = match maker_side {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            let Some(level) = side_map.get_mut(&price) else {
                continue;
            };
            while quantity > 0 {
                let Some(maker) = level.orders.first_mut() else {
                    break;
                };
                let fill_qty = quantity.min(maker.quantity);
                maker.quantity -= fill_qty;
                maker.filled += fill_qty;
                quantity -= fill_qty;
                let fully_filled = maker.quantity == 0;
                fills.push(Fill {
                    maker_id: maker.id.clone(),
                    price,
                    quantity: fill_qty,
                    maker_fully_filled: fully_filled,
                });
                if fully_filled {
                    let drained = level.orders.remove(0);
                    self.ids.remove(&drained.id);
                } else {
                    break;
                }
            }
            if level.orders.is_empty() {
                side_map.remove(&price);
            }
        }
        fills
    }

    /// Top-`depth` levels of one side: bids descending, asks ascending, each
    /// entry summing the remaining quantity of every order at that price.
    /// Depth zero yields an empty snapshot.
    pub fn aggregate(&self, side: Side, depth: usize) -> Vec<LevelSummary> {
        if depth == 0 {
            return Vec::new();
        }
        let side_map = self.levels(side);
        let mut prices: Vec<i64> = side_map.keys().copied().collect();
        match side {
            Side::Buy => prices.sort_unstable_by(|a, b| b.cmp(a)),
            Side::Sell => prices.sort_unstable(),
        }
        prices
            .into_iter()
            .take(depth)
            .map(|price| LevelSummary {
                price,
                quantity: side_map[&price].remaining(),
            })
            .collect()
    }

    /// Best bid price (highest), if any.
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.keys().copied().max()
    }

    /// Best ask price (lowest), if any.
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.keys().copied().min()
    }

    /// True when no resting orders remain on either side.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Number of resting orders across both sides.
    pub fn resting_orders(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resting(id: &str, side: Side, price: i64, qty: i64) -> Order {
        Order::limit(id, "ABC", side, price, qty, 1)
    }

    #[test]
    fn add_and_cancel_order() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("o-1", Side::Buy, 100, 10));
        assert_eq!(book.best_bid(), Some(100));
        assert!(book.cancel("o-1").is_some());
        assert!(book.best_bid().is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn cancel_unknown_id_returns_none() {
        let mut book = OrderBook::new("ABC");
        assert!(book.cancel("nope").is_none());
    }

    #[test]
    fn cancel_leaves_other_orders_at_level() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("o-1", Side::Sell, 100, 4));
        book.add_resting(resting("o-2", Side::Sell, 100, 6));
        assert!(book.cancel("o-1").is_some());
        assert_eq!(book.best_ask(), Some(100));
        assert_eq!(book.get("o-2").unwrap().quantity, 6);
    }

    #[test]
    fn readd_after_cancel_goes_to_tail() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("o-1", Side::Sell, 100, 4));
        book.add_resting(resting("o-2", Side::Sell, 100, 6));
        book.cancel("o-1");
        book.add_resting(resting("o-3", Side::Sell, 100, 2));

        let fills = book.take_from_asks(100, 8);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].maker_id, "o-2");
        assert_eq!(fills[1].maker_id, "o-3");
    }

    #[test]
    fn take_consumes_ascending_ask_prices_head_first() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("cheap", Side::Sell, 99, 5));
        book.add_resting(resting("dear", Side::Sell, 101, 5));
        let fills = book.take_from_asks(101, 7);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].maker_id, "cheap");
        assert_eq!(fills[0].price, 99);
        assert_eq!(fills[0].quantity, 5);
        assert!(fills[0].maker_fully_filled);
        assert_eq!(fills[1].maker_id, "dear");
        assert_eq!(fills[1].quantity, 2);
        assert!(!fills[1].maker_fully_filled);
        // partially consumed maker keeps the level alive
        assert_eq!(book.best_ask(), Some(101));
        assert_eq!(book.get("dear").unwrap().quantity, 3);
        assert_eq!(book.get("dear").unwrap().filled, 2);
    }

    #[test]
    fn take_stops_at_price_limit() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("in", Side::Sell, 100, 5));
        book.add_resting(resting("out", Side::Sell, 105, 5));
        let fills = book.take_from_asks(100, 10);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].maker_id, "in");
        assert_eq!(book.best_ask(), Some(105));
    }

    #[test]
    fn take_from_bids_descends() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("low", Side::Buy, 98, 5));
        book.add_resting(resting("high", Side::Buy, 100, 5));
        let fills = book.take_from_bids(98, 6);
        assert_eq!(fills[0].maker_id, "high");
        assert_eq!(fills[0].price, 100);
        assert_eq!(fills[1].maker_id, "low");
        assert_eq!(fills[1].quantity, 1);
    }

    #[test]
    fn drained_level_is_deleted() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("o-1", Side::Sell, 100, 5));
        let fills = book.take_from_asks(100, 5);
        assert!(fills[0].maker_fully_filled);
        assert!(book.is_empty());
        assert!(book.get("o-1").is_none());
        assert_eq!(book.resting_orders(), 0);
    }

    #[test]
    fn aggregate_sums_remaining_and_orders_by_price() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("b1", Side::Buy, 99, 5));
        book.add_resting(resting("b2", Side::Buy, 99, 3));
        book.add_resting(resting("b3", Side::Buy, 100, 2));
        book.add_resting(resting("a1", Side::Sell, 101, 7));

        let bids = book.aggregate(Side::Buy, 10);
        assert_eq!(
            bids,
            vec![
                LevelSummary { price: 100, quantity: 2 },
                LevelSummary { price: 99, quantity: 8 },
            ]
        );
        let asks = book.aggregate(Side::Sell, 10);
        assert_eq!(asks, vec![LevelSummary { price: 101, quantity: 7 }]);
    }

    #[test]
    fn aggregate_counts_partially_filled_orders_at_remaining() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("a1", Side::Sell, 100, 10));
        book.take_from_asks(100, 6);
        let asks = book.aggregate(Side::Sell, 10);
        assert_eq!(asks, vec![LevelSummary { price: 100, quantity: 4 }]);
    }

    #[test]
    fn aggregate_truncates_to_depth() {
        let mut book = OrderBook::new("ABC");
        for (i, price) in [101, 102, 103, 104].iter().enumerate() {
            book.add_resting(resting(&format!("a{i}"), Side::Sell, *price, 1));
        }
        let asks = book.aggregate(Side::Sell, 2);
        assert_eq!(asks.len(), 2);
        assert_eq!(asks[0].price, 101);
        assert_eq!(asks[1].price, 102);
    }

    #[test]
    fn aggregate_depth_zero_is_empty() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("a1", Side::Sell, 100, 1));
        assert!(book.aggregate(Side::Sell, 0).is_empty());
    }

    #[test]
    fn aggregate_depth_beyond_levels_returns_all() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("a1", Side::Sell, 100, 1));
        book.add_resting(resting("a2", Side::Sell, 101, 1));
        assert_eq!(book.aggregate(Side::Sell, 50).len(), 2);
    }

    #[test]
    fn available_liquidity_sums_all_prices() {
        let mut book = OrderBook::new("ABC");
        book.add_resting(resting("a1", Side::Sell, 100, 5));
        book.add_resting(resting("a2", Side::Sell, 200, 7));
        assert_eq!(book.available_liquidity(Side::Sell), 12);
        assert_eq!(book.available_liquidity(Side::Buy), 0);
    }
}
