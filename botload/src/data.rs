use crate::measurement::Measurement;
use botload_core::RunStatistics;
use pdatastructs::tdigest::{TDigest, K1};
use std::time::Duration;
use tracing::error;

const TDIGEST_BACKLOG_SIZE: usize = 100;

/// Run-wide accumulation of every [`Measurement`].
///
/// Latencies go into a TDigest so long runs stay bounded in memory.
#[derive(Debug, Clone)]
pub(crate) struct SampleSet {
    samples: Vec<SampleData>,
    latency: TDigest<K1>,
    latency_count: usize,
}

impl SampleSet {
    pub fn new() -> Self {
        Self {
            samples: vec![],
            latency: default_tdigest(),
            latency_count: 0,
        }
    }

    pub fn push(&mut self, measurement: &Measurement) {
        self.samples.push(SampleData {
            success: measurement.success,
            error: measurement.error,
        });

        // Whole microseconds keep centroid means exact, so they never land outside [min, max].
        for latency in measurement.latencies() {
            self.latency.insert(latency.as_micros() as f64);
        }
        self.latency_count += measurement.latencies().len();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn success(&self) -> u64 {
        self.samples.iter().map(|s| s.success).sum()
    }

    pub fn error(&self) -> u64 {
        self.samples.iter().map(|s| s.error).sum()
    }

    pub fn total(&self) -> u64 {
        self.samples.iter().map(SampleData::total).sum()
    }

    pub fn error_rate(&self) -> f64 {
        match self.total() {
            0 => 0.,
            total => self.error() as f64 / total as f64,
        }
    }

    pub fn latency(&self, quantile: f64) -> Duration {
        if self.latency_count == 0 {
            return Duration::ZERO;
        }

        let micros = if self.latency.min() == self.latency.max() {
            self.latency.min()
        } else {
            self.latency.quantile(quantile)
        };

        // NOTE: TDigest can return NaN for degenerate inputs.
        let micros = if micros.is_finite() && micros >= 0. {
            micros
        } else {
            error!("Invalid latency quantile {micros}; reporting zero.");
            0.
        };

        Duration::from_secs_f64(micros / 1_000_000.)
    }

    pub fn statistics(
        &self,
        vus: usize,
        elapsed: Duration,
        iterations_per_vu: Vec<u64>,
    ) -> RunStatistics {
        let requests = self.total();
        let actual_rps = if elapsed.is_zero() {
            0.
        } else {
            requests as f64 / elapsed.as_secs_f64()
        };

        RunStatistics {
            vus,
            elapsed,
            requests,
            success: self.success(),
            error: self.error(),
            error_rate: self.error_rate(),
            actual_rps,
            latency_p50: self.latency(0.5),
            latency_p90: self.latency(0.9),
            latency_p99: self.latency(0.99),
            iterations_per_vu,
        }
    }
}

fn default_tdigest() -> TDigest<K1> {
    TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE)
}

#[derive(Debug, Clone)]
struct SampleData {
    success: u64,
    error: u64,
}

impl SampleData {
    fn total(&self) -> u64 {
        self.success + self.error
    }
}
