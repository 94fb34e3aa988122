//! REST surface for the engine.
//!
//! Used by the binary and by integration tests. Create state with
//! [`create_app_state`] and the router with [`create_router`]. Uses Extension
//! for state so the router is `Router<()>` and works with
//! `into_make_service()`.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::EngineError;
use crate::execution::{SubmitStatus, Trade};
use crate::metrics::Metrics;
use crate::router::{Router, DEFAULT_BUFFER};
use crate::shard::SubmitOutcome;
use crate::store::SymbolDirectory;
use crate::types::{Order, OrderKind, OrderRequest};

/// Shared app state: the shard fabric plus the transport-side collaborators.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub directory: Arc<SymbolDirectory>,
    pub metrics: Arc<Metrics>,
    pub started_at: Instant,
}

/// Builds app state with `num_shards` shards (0 = hardware threads) and the
/// default intake buffer. Must run inside a tokio runtime.
pub fn create_app_state(num_shards: usize) -> AppState {
    create_app_state_with_buffer(num_shards, DEFAULT_BUFFER)
}

pub fn create_app_state_with_buffer(num_shards: usize, buffer: usize) -> AppState {
    let metrics = Arc::new(Metrics::new());
    AppState {
        router: Arc::new(Router::new(num_shards, buffer, metrics.clone())),
        directory: Arc::new(SymbolDirectory::new()),
        metrics,
        started_at: Instant::now(),
    }
}

/// Builds the REST router with the given state. Returns `Router<()>` for
/// `axum::serve`.
pub fn create_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/v1/orders", post(create_order))
        .route("/api/v1/orders/:id", get(get_order).delete(cancel_order))
        .route("/api/v1/orderbook/:symbol", get(get_orderbook))
        .layer(Extension(state))
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[derive(Serialize)]
struct OrderResponse {
    order_id: String,
    symbol: String,
    side: crate::types::Side,
    #[serde(rename = "type")]
    kind: OrderKind,
    price: i64,
    /// Original submitted quantity (remaining + filled).
    quantity: i64,
    filled_quantity: i64,
    remaining: i64,
    trades_executed: Vec<Trade>,
}

impl OrderResponse {
    fn from_outcome(outcome: &SubmitOutcome) -> Self {
        Self::from_order(&outcome.order, outcome.trades.clone())
    }

    fn from_order(order: &Order, trades_executed: Vec<Trade>) -> Self {
        Self {
            order_id: order.id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            kind: order.kind,
            price: order.price,
            quantity: order.original_quantity(),
            filled_quantity: order.filled,
            remaining: order.quantity,
            trades_executed,
        }
    }
}

/// Snapshot view for GET by id: same shape as the submit response, minus the
/// trade list.
#[derive(Serialize)]
struct OrderView {
    order_id: String,
    symbol: String,
    side: crate::types::Side,
    #[serde(rename = "type")]
    kind: OrderKind,
    price: i64,
    quantity: i64,
    filled_quantity: i64,
    remaining: i64,
}

impl OrderView {
    fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            kind: order.kind,
            price: order.price,
            quantity: order.original_quantity(),
            filled_quantity: order.filled,
            remaining: order.quantity,
        }
    }
}

/// POST /api/v1/orders
///
/// 201 rested, 200 fully filled, 202 partially filled; 400 on validation or
/// market-liquidity rejection.
async fn create_order(
    Extension(state): Extension<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return EngineError::InvalidRequest("invalid json".into()).into_response();
    };
    let order = match request.into_order(Uuid::new_v4().to_string(), unix_millis()) {
        Ok(order) => order,
        Err(err) => return err.into_response(),
    };

    match state.router.submit(order).await {
        Ok(outcome) => {
            // makers this submit fully filled are terminal: clear their
            // directory entries so lookup/cancel answer not-found
            for maker_id in &outcome.filled_makers {
                state.directory.remove(maker_id);
            }
            if outcome.order.kind == OrderKind::Limit && outcome.order.quantity > 0 {
                state
                    .directory
                    .insert(&outcome.order.id, &outcome.order.symbol);
            }
            let status = match outcome.status {
                SubmitStatus::Rested => StatusCode::CREATED,
                SubmitStatus::Filled => StatusCode::OK,
                SubmitStatus::Partial => StatusCode::ACCEPTED,
            };
            (status, Json(OrderResponse::from_outcome(&outcome))).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// GET /api/v1/orders/{id}
async fn get_order(Extension(state): Extension<AppState>, Path(id): Path<String>) -> Response {
    let Some(symbol) = state.directory.get(&id) else {
        return EngineError::NotFound.into_response();
    };
    match state.router.get_order(&symbol, &id).await {
        Ok(order) => (StatusCode::OK, Json(OrderView::from_order(&order))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// DELETE /api/v1/orders/{id}
async fn cancel_order(Extension(state): Extension<AppState>, Path(id): Path<String>) -> Response {
    let Some(symbol) = state.directory.get(&id) else {
        return EngineError::NotFound.into_response();
    };
    match state.router.cancel(&symbol, &id).await {
        Ok(()) => {
            state.directory.remove(&id);
            (
                StatusCode::OK,
                Json(serde_json::json!({ "status": "cancelled" })),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Deserialize)]
struct BookQuery {
    depth: Option<String>,
}

/// GET /api/v1/orderbook/{symbol}?depth=N
///
/// `depth` defaults to 10 unless it parses as a positive integer.
async fn get_orderbook(
    Extension(state): Extension<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<BookQuery>,
) -> Response {
    let depth = query
        .depth
        .and_then(|d| d.parse::<i64>().ok())
        .filter(|d| *d > 0)
        .unwrap_or(10);
    match state.router.book_snapshot(&symbol, depth).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /health
async fn health(Extension(state): Extension<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "uptime_sec": state.started_at.elapsed().as_secs(),
            "orders_processed": state.metrics.orders_processed(),
        })),
    )
        .into_response()
}

/// GET /metrics
async fn metrics(Extension(state): Extension<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "orders_processed": state.metrics.orders_processed(),
        })),
    )
        .into_response()
}
