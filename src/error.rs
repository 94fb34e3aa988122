//! Error kinds surfaced by the engine and their HTTP mapping.
//!
//! All errors are local: handlers surface them in the reply and no retries
//! happen inside the engine. Validation and liquidity errors are non-mutating.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every failure the engine can report to a caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Request body could not be decoded.
    #[error("{0}")]
    InvalidRequest(String),

    /// Order failed syntactic validation before touching any book.
    #[error("{0}")]
    Validation(String),

    /// Market order cannot be fully filled by the opposite side.
    #[error("insufficient liquidity for market order")]
    InsufficientLiquidity,

    /// Unknown order id for lookup or cancel.
    #[error("order not found")]
    NotFound,

    /// Cancel raced with a fill that completed the order.
    #[error("cannot cancel a fully filled order")]
    AlreadyFilled,

    /// The shard fabric is absent or already stopped.
    #[error("matching engine is not running")]
    NotRunning,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match self {
            EngineError::InvalidRequest(_)
            | EngineError::Validation(_)
            | EngineError::InsufficientLiquidity
            | EngineError::AlreadyFilled => StatusCode::BAD_REQUEST,
            EngineError::NotFound => StatusCode::NOT_FOUND,
            EngineError::NotRunning => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
