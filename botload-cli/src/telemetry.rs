use crate::error::CliError;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub(crate) const DEFAULT_LOG_FILTER: &str = "botload=info";

/// Log to stderr so that stdout only carries the summary or the prediction.
pub(crate) fn init(filter: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_new(filter)?;
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

pub(crate) fn install_prometheus(addr: SocketAddr) -> Result<(), CliError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Serving Prometheus metrics on http://{addr}/metrics");
    Ok(())
}
