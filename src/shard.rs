//! Shard actor: the sole mutator for the books of the symbols it owns.
//!
//! A shard is a single tokio task draining a bounded command intake strictly
//! in arrival order. All book and id-map state lives inside the task; nothing
//! else touches it. Replies go back over one-shot channels and a dropped
//! receiver is tolerated silently (the transport may have timed out).

use crate::error::EngineError;
use crate::execution::{SubmitStatus, Trade};
use crate::matching::process_order;
use crate::metrics::Metrics;
use crate::order_book::{LevelSummary, OrderBook};
use crate::types::{Order, OrderKind, Side};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// A command routed to a shard, with its single-use reply channel.
pub(crate) enum Command {
    Submit {
        order: Order,
        reply: oneshot::Sender<Result<SubmitOutcome, EngineError>>,
    },
    Cancel {
        order_id: String,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    GetOrder {
        order_id: String,
        reply: oneshot::Sender<Result<Order, EngineError>>,
    },
    GetBook {
        symbol: String,
        depth: i64,
        reply: oneshot::Sender<BookSnapshot>,
    },
}

/// Reply to an accepted submit.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    /// The order after processing: `filled`/`quantity` updated.
    pub order: Order,
    pub trades: Vec<Trade>,
    pub status: SubmitStatus,
    /// Resting orders fully drained by this submit. The transport uses these
    /// to clear its id->symbol directory at fill time.
    pub filled_makers: Vec<String>,
}

/// Aggregated depth snapshot for one symbol.
#[derive(Clone, Debug, Serialize)]
pub struct BookSnapshot {
    pub symbol: String,
    pub bids: Vec<LevelSummary>,
    pub asks: Vec<LevelSummary>,
}

/// Depth applied when a snapshot request asks for zero or less.
const DEFAULT_DEPTH: usize = 10;

pub(crate) struct Shard {
    books: HashMap<String, OrderBook>,
    /// Resting order id -> owning symbol, for cancel and lookup.
    orders: HashMap<String, String>,
    metrics: Arc<Metrics>,
}

/// Starts a shard task and returns its intake.
pub(crate) fn spawn(
    buffer: usize,
    metrics: Arc<Metrics>,
    quit: watch::Receiver<bool>,
) -> mpsc::Sender<Command> {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let shard = Shard {
        books: HashMap::new(),
        orders: HashMap::new(),
        metrics,
    };
    tokio::spawn(shard.run(rx, quit));
    tx
}

impl Shard {
    async fn run(mut self, mut intake: mpsc::Receiver<Command>, mut quit: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                cmd = intake.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
                _ = quit.changed() => break,
            }
        }
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Submit { order, reply } => {
                let _ = reply.send(self.submit(order));
            }
            Command::Cancel { order_id, reply } => {
                let _ = reply.send(self.cancel(&order_id));
            }
            Command::GetOrder { order_id, reply } => {
                let _ = reply.send(self.get_order(&order_id));
            }
            Command::GetBook { symbol, depth, reply } => {
                let _ = reply.send(self.book_snapshot(symbol, depth));
            }
        }
    }

    fn submit(&mut self, mut order: Order) -> Result<SubmitOutcome, EngineError> {
        let book = self
            .books
            .entry(order.symbol.clone())
            .or_insert_with(|| OrderBook::new(order.symbol.clone()));

        let outcome = process_order(book, &mut order)?;

        for maker_id in &outcome.filled_makers {
            self.orders.remove(maker_id);
        }
        if order.kind == OrderKind::Limit && order.quantity > 0 {
            self.orders.insert(order.id.clone(), order.symbol.clone());
        }

        let status = SubmitStatus::classify(&order);
        self.metrics.inc_orders_processed();
        Ok(SubmitOutcome {
            order,
            trades: outcome.trades,
            status,
            filled_makers: outcome.filled_makers,
        })
    }

    fn cancel(&mut self, order_id: &str) -> Result<(), EngineError> {
        let Some(symbol) = self.orders.get(order_id).cloned() else {
            // unknown, or already removed at fill time
            return Err(EngineError::NotFound);
        };
        let Some(book) = self.books.get_mut(&symbol) else {
            return Err(EngineError::NotFound);
        };
        match book.get(order_id) {
            None => Err(EngineError::NotFound),
            Some(order) if order.is_filled() => Err(EngineError::AlreadyFilled),
            Some(_) => {
                book.cancel(order_id);
                self.orders.remove(order_id);
                Ok(())
            }
        }
    }

    fn get_order(&self, order_id: &str) -> Result<Order, EngineError> {
        let symbol = self.orders.get(order_id).ok_or(EngineError::NotFound)?;
        let book = self.books.get(symbol).ok_or(EngineError::NotFound)?;
        // snapshot copy; internal state never leaves the shard
        book.get(order_id).cloned().ok_or(EngineError::NotFound)
    }

    fn book_snapshot(&self, symbol: String, depth: i64) -> BookSnapshot {
        let depth = if depth <= 0 {
            DEFAULT_DEPTH
        } else {
            depth as usize
        };
        let (bids, asks) = match self.books.get(&symbol) {
            Some(book) => (book.aggregate(Side::Buy, depth), book.aggregate(Side::Sell, depth)),
            None => (Vec::new(), Vec::new()),
        };
        BookSnapshot { symbol, bids, asks }
    }
}
