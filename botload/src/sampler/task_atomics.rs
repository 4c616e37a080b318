use crate::measurement::Measurement;
use crate::transaction::TransactionData;
use metrics_util::AtomicBucket;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters shared by every virtual user of a run.
pub(crate) struct TaskAtomics {
    success: Arc<AtomicU64>,
    error: Arc<AtomicU64>,
    latency: Arc<AtomicBucket<Duration>>,
}

impl TaskAtomics {
    pub fn new() -> Self {
        Self {
            success: Arc::new(AtomicU64::new(0)),
            error: Arc::new(AtomicU64::new(0)),
            latency: Arc::new(AtomicBucket::new()),
        }
    }

    pub fn clone_to_transaction_data(&self) -> TransactionData {
        TransactionData {
            success: self.success.clone(),
            error: self.error.clone(),
            latency: self.latency.clone(),
        }
    }

    /// Drain the counters into a [`Measurement`] covering `elapsed`.
    pub fn collect(&self, elapsed: Duration) -> Measurement {
        let success = self.success.swap(0, Ordering::Relaxed);
        let error = self.error.swap(0, Ordering::Relaxed);
        let mut latencies = vec![];
        self.latency.clear_with(|dur| latencies.extend_from_slice(dur));
        Measurement::new(success, error, elapsed, latencies)
    }
}
