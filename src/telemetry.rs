//! src/telemetry.rs

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Metrics {
    pub tool_calls: AtomicU64,
    pub tool_failures: AtomicU64,
    pub position_fallbacks: AtomicU64,
    pub transactions_sent: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_tool_calls(&self) {
        self.tool_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_failures(&self) {
        self.tool_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_position_fallbacks(&self) {
        self.position_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_transactions_sent(&self) {
        self.transactions_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tool_calls: self.tool_calls.load(Ordering::Relaxed),
            tool_failures: self.tool_failures.load(Ordering::Relaxed),
            position_fallbacks: self.position_fallbacks.load(Ordering::Relaxed),
            transactions_sent: self.transactions_sent.load(Ordering::Relaxed),
        }
    }

    pub fn log_summary(&self) {
        let s = self.snapshot();
        info!(
            "📊 Tool calls: {} (failed: {}), position fallbacks: {}, transactions sent: {}",
            s.tool_calls, s.tool_failures, s.position_fallbacks, s.transactions_sent
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub tool_calls: u64,
    pub tool_failures: u64,
    pub position_fallbacks: u64,
    pub transactions_sent: u64,
}
