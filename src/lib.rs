//! # Matchbook
//!
//! In-memory order matching engine for a multi-symbol trading venue: limit
//! and market orders, price-time priority, aggregated depth snapshots, and
//! lookup/cancel by order id.
//!
//! Books are partitioned across shard actors. Each shard is a single tokio
//! task owning a disjoint subset of symbols and draining a bounded command
//! intake in arrival order, so per-symbol operations are linearizable without
//! locks. The [`Router`] hashes a symbol to its shard and performs the
//! request/response round-trip.
//!
//! ## Example
//!
//! The matching core is usable on its own, synchronously:
//!
//! ```rust
//! use matchbook::{matching, Order, OrderBook, Side};
//!
//! let mut book = OrderBook::new("ABC");
//! let mut sell = Order::limit("s-1", "ABC", Side::Sell, 100, 10, 1);
//! matching::process_order(&mut book, &mut sell).unwrap();
//!
//! let mut buy = Order::limit("b-1", "ABC", Side::Buy, 105, 10, 2);
//! let outcome = matching::process_order(&mut book, &mut buy).unwrap();
//! assert_eq!(outcome.trades.len(), 1);
//! assert_eq!(outcome.trades[0].price, 100); // taker fills at the resting price
//! assert!(book.is_empty());
//! ```
//!
//! The full engine is the sharded, concurrent wrapper: see [`Router`] and
//! [`api::create_router`] for the HTTP surface.

pub mod api;
pub mod error;
pub mod execution;
pub mod matching;
pub mod metrics;
pub mod order_book;
pub mod order_gen;
pub mod router;
mod shard;
pub mod store;
pub mod types;

pub use error::EngineError;
pub use execution::{SubmitStatus, Trade};
pub use metrics::Metrics;
pub use order_book::{Fill, LevelSummary, OrderBook, PriceLevel};
pub use router::Router;
pub use shard::{BookSnapshot, SubmitOutcome};
pub use store::SymbolDirectory;
pub use types::{Order, OrderKind, OrderRequest, Side};
