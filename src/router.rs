//! Symbol-hashed dispatch over a fixed set of shards.
//!
//! The router is stateless after construction: it hashes a symbol to a shard
//! index, pushes a command onto that shard's bounded intake, and waits on a
//! one-shot reply. One shard owns a symbol for the life of the process, so
//! all operations on a symbol are linearizable.

use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::shard::{self, BookSnapshot, Command, SubmitOutcome};
use crate::types::Order;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Intake capacity per shard when the caller does not choose one.
pub const DEFAULT_BUFFER: usize = 1024;

/// Routes commands to `n` shard actors by symbol hash.
pub struct Router {
    shards: Vec<mpsc::Sender<Command>>,
    quit: watch::Sender<bool>,
    metrics: Arc<Metrics>,
}

impl Router {
    /// Spawns `num_shards` shards (0 = number of hardware threads), each with
    /// a bounded intake of `buffer` commands. Must run inside a tokio runtime.
    pub fn new(num_shards: usize, buffer: usize, metrics: Arc<Metrics>) -> Self {
        let n = if num_shards == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
        } else {
            num_shards
        };
        let (quit_tx, quit_rx) = watch::channel(false);
        let shards = (0..n)
            .map(|_| shard::spawn(buffer, metrics.clone(), quit_rx.clone()))
            .collect();
        Self {
            shards,
            quit: quit_tx,
            metrics,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Signals every shard to exit at its next scheduling point. In-flight
    /// commands already dequeued complete normally; commands pushed after the
    /// signal are not guaranteed to be processed.
    pub fn stop(&self) {
        let _ = self.quit.send(true);
    }

    /// Pure routing rule: same symbol, same shard, for the process lifetime.
    pub fn shard_index(&self, symbol: &str) -> usize {
        fnv1a_32(symbol.as_bytes()) as usize % self.shards.len()
    }

    /// Submits an order to the owning shard and waits for the outcome.
    pub async fn submit(&self, order: Order) -> Result<SubmitOutcome, EngineError> {
        let idx = self.shard_index(&order.symbol);
        let (tx, rx) = oneshot::channel();
        self.dispatch(idx, Command::Submit { order, reply: tx }).await?;
        rx.await.map_err(|_| EngineError::NotRunning)?
    }

    /// Cancels a resting order. The caller resolves the owning symbol (see
    /// [`crate::store::SymbolDirectory`]) so the cancel routes correctly.
    pub async fn cancel(&self, symbol: &str, order_id: &str) -> Result<(), EngineError> {
        let idx = self.shard_index(symbol);
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            idx,
            Command::Cancel {
                order_id: order_id.to_string(),
                reply: tx,
            },
        )
        .await?;
        rx.await.map_err(|_| EngineError::NotRunning)?
    }

    /// Fetches a snapshot copy of a resting order.
    pub async fn get_order(&self, symbol: &str, order_id: &str) -> Result<Order, EngineError> {
        let idx = self.shard_index(symbol);
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            idx,
            Command::GetOrder {
                order_id: order_id.to_string(),
                reply: tx,
            },
        )
        .await?;
        rx.await.map_err(|_| EngineError::NotRunning)?
    }

    /// Aggregated top-`depth` book snapshot for a symbol.
    pub async fn book_snapshot(&self, symbol: &str, depth: i64) -> Result<BookSnapshot, EngineError> {
        let idx = self.shard_index(symbol);
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            idx,
            Command::GetBook {
                symbol: symbol.to_string(),
                depth,
                reply: tx,
            },
        )
        .await?;
        rx.await.map_err(|_| EngineError::NotRunning)
    }

    /// Enqueues on the shard intake. A full intake blocks the caller (the
    /// system's only backpressure mechanism); saturation is counted and
    /// logged, never dropped.
    async fn dispatch(&self, idx: usize, cmd: Command) -> Result<(), EngineError> {
        match self.shards[idx].try_send(cmd) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(cmd)) => {
                self.metrics.inc_intake_saturated();
                tracing::warn!(shard = idx, "shard intake full, waiting");
                self.shards[idx]
                    .send(cmd)
                    .await
                    .map_err(|_| EngineError::NotRunning)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(EngineError::NotRunning),
        }
    }
}

/// 32-bit FNV-1a. Deterministic and stable so symbol routing never moves.
fn fnv1a_32(data: &[u8]) -> u32 {
    let mut hash = 0x811c_9dc5u32;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::SubmitStatus;
    use crate::types::Side;

    fn router(shards: usize) -> Router {
        Router::new(shards, 128, Arc::new(Metrics::new()))
    }

    #[test]
    fn fnv1a_known_vectors() {
        // reference values for the 32-bit FNV-1a test suite
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[tokio::test]
    async fn same_symbol_same_shard() {
        let router = router(4);
        let idx = router.shard_index("SYM-A");
        for _ in 0..10 {
            assert_eq!(router.shard_index("SYM-A"), idx);
        }
        router.stop();
    }

    #[tokio::test]
    async fn submit_get_cancel_round_trip() {
        let router = router(4);
        let order = Order::limit("o-1", "SYM-A", Side::Buy, 500, 10, 1);
        let outcome = router.submit(order).await.unwrap();
        assert_eq!(outcome.status, SubmitStatus::Rested);
        assert!(outcome.trades.is_empty());

        let got = router.get_order("SYM-A", "o-1").await.unwrap();
        assert_eq!(got.id, "o-1");
        assert_eq!(got.quantity, 10);

        router.cancel("SYM-A", "o-1").await.unwrap();
        assert_eq!(
            router.get_order("SYM-A", "o-1").await.unwrap_err(),
            EngineError::NotFound
        );
        assert_eq!(
            router.cancel("SYM-A", "o-1").await.unwrap_err(),
            EngineError::NotFound
        );
        router.stop();
    }

    #[tokio::test]
    async fn symbols_are_isolated() {
        let router = router(2);
        router
            .submit(Order::limit("a-1", "AAA", Side::Sell, 100, 5, 1))
            .await
            .unwrap();
        router
            .submit(Order::limit("b-1", "BBB", Side::Buy, 100, 5, 2))
            .await
            .unwrap();

        // a crossing buy on AAA must not see BBB's bid
        let outcome = router
            .submit(Order::limit("a-2", "AAA", Side::Buy, 100, 5, 3))
            .await
            .unwrap();
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].symbol, "AAA");

        let bbb = router.book_snapshot("BBB", 10).await.unwrap();
        assert_eq!(bbb.bids.len(), 1);
        router.stop();
    }

    #[tokio::test]
    async fn book_snapshot_round_trip() {
        let router = router(4);
        router
            .submit(Order::limit("o-1", "FOO", Side::Buy, 99, 5, 1))
            .await
            .unwrap();
        let snap = router.book_snapshot("FOO", 10).await.unwrap();
        assert_eq!(snap.symbol, "FOO");
        assert_eq!(snap.bids.len(), 1);
        assert_eq!(snap.bids[0].price, 99);
        assert_eq!(snap.bids[0].quantity, 5);
        assert!(snap.asks.is_empty());
        router.stop();
    }

    #[tokio::test]
    async fn commands_after_stop_fail_cleanly() {
        let router = router(2);
        router.stop();
        // give shards a scheduling point to observe the quit signal
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let err = router
            .submit(Order::limit("o-1", "SYM", Side::Buy, 100, 1, 1))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::NotRunning);
    }

    #[tokio::test]
    async fn zero_shards_defaults_to_hardware_threads() {
        let router = router(0);
        assert!(router.shard_count() >= 1);
        router.stop();
    }
}
