use botload::predict::PredictError;
use botload::target::TargetError;
use botload_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("Invalid run configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Target(#[from] TargetError),

    #[error("Invalid prediction client: {0}")]
    Predict(#[from] PredictError),

    #[error("Invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to install the Prometheus exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Failed to encode the summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read the payload: {0}")]
    Io(#[from] std::io::Error),
}
