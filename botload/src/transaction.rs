use botload_core::TransactionLabels;
use metrics_util::AtomicBucket;
use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::time::Instant;

/// Transaction hook used by the `#[transaction]` macro. Not intended to be used manually.
///
/// Inside a run the call is timed and counted; outside of one it is simply awaited.
pub async fn transaction_hook<T, R, E>(labels: TransactionLabels, func: T) -> T::Output
where
    T: Future<Output = Result<R, E>>,
{
    let Ok(hook) = TRANSACTION_HOOK.try_with(|v| v.clone()) else {
        tracing::trace!("No hook available, running {} untracked.", labels.latency);
        return func.await;
    };

    let start = Instant::now();
    let res = func.await;
    let elapsed = start.elapsed();

    hook.latency.push(elapsed);

    if res.is_ok() {
        hook.success.fetch_add(1, Ordering::Relaxed);
    } else {
        hook.error.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Transaction {} failed after {elapsed:?}", labels.error);
    }

    record_metrics(labels, elapsed, res.is_ok());

    res
}

#[cfg(feature = "metrics")]
fn record_metrics(labels: TransactionLabels, elapsed: Duration, success: bool) {
    if labels.is_unlabeled() {
        return;
    }

    // TODO: Describe once per label instead of on every call.
    metrics::describe_histogram!(labels.latency, metrics::Unit::Seconds, "");
    metrics::histogram!(labels.latency).record(elapsed.as_secs_f64());

    if success {
        metrics::counter!(labels.success).increment(1);
    } else {
        metrics::counter!(labels.error).increment(1);
    }
}

#[cfg(not(feature = "metrics"))]
fn record_metrics(_labels: TransactionLabels, _elapsed: Duration, _success: bool) {}

#[derive(Clone)]
pub(crate) struct TransactionData {
    pub success: Arc<AtomicU64>,
    pub error: Arc<AtomicU64>,
    pub latency: Arc<AtomicBucket<Duration>>,
}

tokio::task_local! {
    pub(crate) static TRANSACTION_HOOK: TransactionData;
}
