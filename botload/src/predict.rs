//! Client for the prediction API.
//!
//! Submits a user-provided JSON feature payload to `POST /predict` and renders the answer the
//! way the prediction form does: the pretty-printed JSON response on success, or the error
//! text behind a fixed label on failure.
use botload_core::ERROR_LABEL;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{body}")]
    Rejected { status: StatusCode, body: String },

    #[error("{0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("a prediction request is already in flight")]
    InFlight,
}

/// Result of one submission.
#[derive(Debug)]
pub enum PredictOutcome {
    Success(Value),
    Failure(PredictError),
}

impl PredictOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictOutcome::Success(_))
    }
}

impl From<Result<Value, PredictError>> for PredictOutcome {
    fn from(res: Result<Value, PredictError>) -> Self {
        match res {
            Ok(value) => PredictOutcome::Success(value),
            Err(err) => PredictOutcome::Failure(err),
        }
    }
}

impl fmt::Display for PredictOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictOutcome::Success(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
            PredictOutcome::Failure(err) => write!(f, "{ERROR_LABEL}Error: {err}"),
        }
    }
}

/// Prediction API client. Only one submission may be in flight at a time.
#[derive(Debug)]
pub struct PredictClient {
    client: Client,
    endpoint: Url,
    in_flight: AtomicBool,
}

impl PredictClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, PredictError> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Parse `input` as JSON and post it. Never fails; every error becomes a
    /// [`PredictOutcome::Failure`].
    pub async fn submit(&self, input: &str) -> PredictOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return PredictOutcome::Failure(PredictError::InFlight);
        };

        self.predict(input).await.into()
    }

    #[instrument(name = "predict", skip_all, fields(endpoint = %self.endpoint))]
    async fn predict(&self, input: &str) -> Result<Value, PredictError> {
        let features: Value = serde_json::from_str(input).map_err(PredictError::InvalidPayload)?;

        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&features)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        debug!("Prediction answered {status}");

        if !status.is_success() {
            return Err(PredictError::Rejected { status, body });
        }

        serde_json::from_str(&body).map_err(PredictError::InvalidResponse)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
