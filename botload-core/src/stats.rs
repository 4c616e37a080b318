use humantime::format_duration;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::fmt;
use std::time::Duration;

/// Statistics for a completed run.
///
/// Aggregated by the transaction hook and the runner; the virtual users themselves never
/// inspect a response.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub vus: usize,
    #[serde_as(as = "DurationSeconds<f64>")]
    pub elapsed: Duration,
    /// Transactions which completed before the deadline.
    pub requests: u64,
    pub success: u64,
    pub error: u64,
    pub error_rate: f64,
    pub actual_rps: f64,
    #[serde_as(as = "DurationMilliSeconds<f64>")]
    pub latency_p50: Duration,
    #[serde_as(as = "DurationMilliSeconds<f64>")]
    pub latency_p90: Duration,
    #[serde_as(as = "DurationMilliSeconds<f64>")]
    pub latency_p99: Duration,
    /// Iterations started by each virtual user, indexed by user.
    pub iterations_per_vu: Vec<u64>,
}

impl RunStatistics {
    pub fn iterations(&self) -> u64 {
        self.iterations_per_vu.iter().sum()
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "requests.......: {} ({:.2}/s)",
            self.requests, self.actual_rps
        )?;
        writeln!(f, "  success......: {}", self.success)?;
        writeln!(
            f,
            "  error........: {} ({:.2}%)",
            self.error,
            self.error_rate * 100.
        )?;
        writeln!(
            f,
            "latency........: p50={:?} p90={:?} p99={:?}",
            self.latency_p50, self.latency_p90, self.latency_p99
        )?;
        writeln!(
            f,
            "iterations.....: {} across {} VUs",
            self.iterations(),
            self.vus
        )?;
        write!(f, "duration.......: {}", format_duration(self.elapsed))
    }
}
