//! Process-level counters shared between shards and the HTTP surface.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters, updated with relaxed fetch-and-add from any task.
///
/// `orders_processed` counts submits accepted by a shard (resting, partial,
/// and full fills); rejections are not counted.
#[derive(Debug, Default)]
pub struct Metrics {
    orders_processed: AtomicU64,
    intake_saturated: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_orders_processed(&self) {
        self.orders_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn orders_processed(&self) -> u64 {
        self.orders_processed.load(Ordering::Relaxed)
    }

    /// Records a command that found its shard intake full and had to wait.
    #[inline]
    pub fn inc_intake_saturated(&self) {
        self.intake_saturated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn intake_saturated(&self) -> u64 {
        self.intake_saturated.load(Ordering::Relaxed)
    }
}
