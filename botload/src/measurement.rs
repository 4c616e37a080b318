use std::fmt;
use std::time::Duration;

/// Transactions observed during one report interval.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub success: u64,
    pub error: u64,
    pub elapsed: Duration,
    latencies: Vec<Duration>,
}

impl Measurement {
    pub fn new(success: u64, error: u64, elapsed: Duration, mut latencies: Vec<Duration>) -> Self {
        latencies.sort_unstable();
        Self {
            success,
            error,
            elapsed,
            latencies,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    /// Completed transactions per second, successful or not.
    pub fn rps(&self) -> f64 {
        if self.elapsed.is_zero() {
            return 0.;
        }
        self.total() as f64 / self.elapsed.as_secs_f64()
    }

    pub fn error_rate(&self) -> f64 {
        match self.total() {
            0 => 0.,
            total => self.error as f64 / total as f64,
        }
    }

    /// Nearest-rank latency quantile. Zero when nothing completed.
    pub fn latency(&self, quantile: f64) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let rank = (quantile.clamp(0., 1.) * self.latencies.len() as f64).ceil() as usize;
        self.latencies[rank.saturating_sub(1)]
    }

    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RPS={:.2}, ErrorRate={:.2}, p50={:?}, p90={:?}, p99={:?}",
            self.rps(),
            self.error_rate(),
            self.latency(0.5),
            self.latency(0.90),
            self.latency(0.99),
        )
    }
}
