//! Trades and submit outcome classification.

use crate::types::{Order, Side};
use serde::{Deserialize, Serialize};

/// One match between an incoming order and a resting order.
///
/// `side` is the taker's side; `price` is always the resting order's price
/// (price improvement favours the taker).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: Side,
    pub price: i64,
    pub quantity: i64,
}

/// How an accepted submission ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmitStatus {
    /// Limit order placed on the book with no fills.
    Rested,
    /// No remaining quantity after matching.
    Filled,
    /// Some fills and a remainder resting on the book.
    Partial,
}

impl SubmitStatus {
    /// Classifies an order after the matching pass.
    pub fn classify(order: &Order) -> Self {
        if order.filled > 0 && order.quantity == 0 {
            SubmitStatus::Filled
        } else if order.filled > 0 {
            SubmitStatus::Partial
        } else {
            SubmitStatus::Rested
        }
    }
}
