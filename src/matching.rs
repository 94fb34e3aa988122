//! Price-time priority matching.
//!
//! [`process_order`] runs one order against its book: market orders are
//! checked for full liquidity and rejected atomically otherwise, then
//! liquidity is taken best-price-first, oldest-first within a level, and a
//! limit remainder is rested on the book.

use crate::error::EngineError;
use crate::execution::Trade;
use crate::order_book::OrderBook;
use crate::types::{Order, OrderKind, Side};

/// Result of one matching pass.
#[derive(Clone, Debug, Default)]
pub struct MatchOutcome {
    /// One trade per consumed resting order, in match order.
    pub trades: Vec<Trade>,
    /// Ids of resting orders fully drained by this pass, so the owner can
    /// drop them from its id map.
    pub filled_makers: Vec<String>,
}

/// Matches `order` against `book`, mutating both.
///
/// On success the order's `filled`/`quantity` reflect the pass and any limit
/// remainder has been rested. A market order that cannot fully fill is
/// rejected before any state changes.
pub fn process_order(book: &mut OrderBook, order: &mut Order) -> Result<MatchOutcome, EngineError> {
    if order.kind == OrderKind::Market
        && book.available_liquidity(order.side.opposite()) < order.quantity
    {
        return Err(EngineError::InsufficientLiquidity);
    }

    // Market orders sweep the whole opposite side; the liquidity precondition
    // guarantees they fill.
    let price_limit = match (order.kind, order.side) {
        (OrderKind::Limit, _) => order.price,
        (OrderKind::Market, Side::Buy) => i64::MAX,
        (OrderKind::Market, Side::Sell) => i64::MIN,
    };

    let fills = match order.side {
        Side::Buy => book.take_from_asks(price_limit, order.quantity),
        Side::Sell => book.take_from_bids(price_limit, order.quantity),
    };

    let mut outcome = MatchOutcome {
        trades: Vec::with_capacity(fills.len()),
        filled_makers: Vec::new(),
    };
    for fill in fills {
        order.filled += fill.quantity;
        order.quantity -= fill.quantity;
        outcome.trades.push(Trade {
            symbol: book.symbol().to_string(),
            side: order.side,
            price: fill.price,
            quantity: fill.quantity,
        });
        if fill.maker_fully_filled {
            outcome.filled_makers.push(fill.maker_id);
        }
    }

    if order.kind == OrderKind::Limit && order.quantity > 0 {
        book.add_resting(order.clone());
    }

    Ok(outcome)
}
