//! Order model and request validation.
//!
//! [`Order`] carries `quantity` as the *remaining* open quantity and `filled`
//! as the cumulative executed quantity, so `quantity + filled` is the original
//! submitted size at every point in the order's life. Prices are integer minor
//! units (cents); no floating point anywhere in the match path.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(Side::Buy),
            "SELL" => Some(Side::Sell),
            _ => None,
        }
    }

    /// The side an incoming order takes liquidity from.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order kind: limit (with price) or market (take best available).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    Limit,
    Market,
}

impl OrderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LIMIT" => Some(OrderKind::Limit),
            "MARKET" => Some(OrderKind::Market),
            _ => None,
        }
    }
}

/// A validated order.
///
/// `price` is required > 0 for limit orders and carried through untouched for
/// market orders (matching never reads it there).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub price: i64,
    /// Remaining open quantity.
    pub quantity: i64,
    /// Cumulative executed quantity.
    pub filled: i64,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
}

impl Order {
    pub fn limit(
        id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        price: i64,
        quantity: i64,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            kind: OrderKind::Limit,
            price,
            quantity,
            filled: 0,
            timestamp,
        }
    }

    pub fn market(
        id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        quantity: i64,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            kind: OrderKind::Market,
            price: 0,
            quantity,
            filled: 0,
            timestamp,
        }
    }

    /// The quantity originally submitted.
    pub fn original_quantity(&self) -> i64 {
        self.quantity + self.filled
    }

    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }
}

/// Raw submission as it arrives over the wire. Side and kind stay strings so
/// validation can reject them with a distinct message instead of a decode
/// failure.
#[derive(Clone, Debug, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub quantity: i64,
}

impl OrderRequest {
    /// Syntactic validation only; no business checks like available liquidity.
    pub fn validate(&self) -> Result<(Side, OrderKind), EngineError> {
        if self.symbol.is_empty() {
            return Err(EngineError::Validation("symbol is required".into()));
        }
        let side = Side::parse(&self.side)
            .ok_or_else(|| EngineError::Validation("invalid side: must be BUY or SELL".into()))?;
        let kind = OrderKind::parse(&self.kind).ok_or_else(|| {
            EngineError::Validation("invalid type: must be LIMIT or MARKET".into())
        })?;
        if self.quantity <= 0 {
            return Err(EngineError::Validation("quantity must be > 0".into()));
        }
        if kind == OrderKind::Limit && self.price <= 0 {
            return Err(EngineError::Validation(
                "limit orders must have price > 0 (in cents)".into(),
            ));
        }
        Ok((side, kind))
    }

    /// Validates and stamps the request into an [`Order`].
    pub fn into_order(self, id: String, timestamp: i64) -> Result<Order, EngineError> {
        let (side, kind) = self.validate()?;
        Ok(Order {
            id,
            symbol: self.symbol,
            side,
            kind,
            price: self.price,
            quantity: self.quantity,
            filled: 0,
            timestamp,
        })
    }
}
