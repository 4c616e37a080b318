use crate::{DEFAULT_DURATION, DEFAULT_PAUSE, DEFAULT_REPORT_INTERVAL, DEFAULT_VUS};
use humantime::format_duration;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one virtual user is required")]
    NoVirtualUsers,

    #[error("Run duration must be greater than zero")]
    ZeroDuration,

    #[error("Report interval must be greater than zero")]
    ZeroReportInterval,
}

/// Parameters of a single traffic run.
///
/// Set once before the run starts and read-only for its whole lifetime.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    /// Number of independent virtual users.
    pub vus: usize,
    /// Wall-clock span of the run, measured from its start.
    #[serde_as(as = "DurationSeconds<f64>")]
    pub duration: Duration,
    /// Sleep between two iterations of the same virtual user.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub pause: Duration,
    #[serde_as(as = "DurationSeconds<f64>")]
    pub report_interval: Duration,
}

impl RunConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vus: DEFAULT_VUS,
            duration: DEFAULT_DURATION,
            pause: DEFAULT_PAUSE,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vus == 0 {
            return Err(ConfigError::NoVirtualUsers);
        }
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if self.report_interval.is_zero() {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }

    /// A run which can never issue a request.
    pub fn is_noop(&self) -> bool {
        self.vus == 0 || self.duration.is_zero()
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} VUs for {} (pause {})",
            self.name,
            self.vus,
            format_duration(self.duration),
            format_duration(self.pause),
        )
    }
}
