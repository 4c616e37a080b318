use crate::telemetry::DEFAULT_LOG_FILTER;
use botload_core::{RunConfig, DEFAULT_PREDICT_URL, DEFAULT_TARGET, DEFAULT_VUS};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Session traffic generator and prediction client")]
pub(crate) struct BotloadCli {
    /// Log filter directives, e.g. `botload=debug`.
    #[arg(long, global = true, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Generate session traffic until the duration has elapsed.
    Run(RunArgs),

    /// Submit a JSON feature payload to the prediction API and print the answer.
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Base URL of the session service; `/generate_session` is appended.
    #[arg(short, long, env = "BOTLOAD_TARGET", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Number of virtual users.
    #[arg(short = 'u', long, env = "BOTLOAD_VUS", default_value_t = DEFAULT_VUS)]
    pub vus: usize,

    /// Total run duration, e.g. `30s` or `2m`.
    #[arg(short, long, env = "BOTLOAD_DURATION", default_value = "30s", value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// Pause between two requests of the same virtual user.
    #[arg(short, long, env = "BOTLOAD_PAUSE", default_value = "1s", value_parser = humantime::parse_duration)]
    pub pause: Duration,

    /// Interval between two progress samples.
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub report_interval: Duration,

    /// Timeout of a single request.
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Serve Prometheus metrics on this address while running.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Scenario name used in logs.
    #[arg(long, default_value = "bot_traffic")]
    pub name: String,
}

impl RunArgs {
    pub fn config(&self) -> RunConfig {
        RunConfig {
            name: self.name.clone(),
            vus: self.vus,
            duration: self.duration,
            pause: self.pause,
            report_interval: self.report_interval,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    #[arg(long, env = "BOTLOAD_PREDICT_URL", default_value = DEFAULT_PREDICT_URL)]
    pub url: String,

    /// Timeout of the request.
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// JSON payload. Read from stdin when omitted or `-`.
    pub payload: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use botload_core::{
        ConfigError, DEFAULT_DURATION, DEFAULT_PAUSE, DEFAULT_REPORT_INTERVAL,
        DEFAULT_REQUEST_TIMEOUT,
    };
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        BotloadCli::command().debug_assert();
    }

    #[test]
    fn run_defaults_match_core() {
        let cli = BotloadCli::try_parse_from(["botload", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };

        assert_eq!(args.timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(args.metrics_addr.is_none());
        assert!(!args.json);

        let config = args.config();
        let defaults = RunConfig::new("bot_traffic");
        if std::env::var_os("BOTLOAD_VUS").is_none() {
            assert_eq!(config.vus, defaults.vus);
        }
        if std::env::var_os("BOTLOAD_DURATION").is_none() {
            assert_eq!(config.duration, DEFAULT_DURATION);
        }
        if std::env::var_os("BOTLOAD_PAUSE").is_none() {
            assert_eq!(config.pause, DEFAULT_PAUSE);
        }
        assert_eq!(config.report_interval, DEFAULT_REPORT_INTERVAL);
    }

    #[test]
    fn run_arguments() {
        let cli = BotloadCli::try_parse_from([
            "botload",
            "run",
            "-t",
            "http://localhost:5000",
            "-u",
            "10",
            "-d",
            "2m",
            "--pause",
            "250ms",
            "--metrics-addr",
            "127.0.0.1:9000",
            "--json",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };

        assert_eq!(args.target, "http://localhost:5000");
        assert_eq!(args.metrics_addr, Some("127.0.0.1:9000".parse().unwrap()));
        assert!(args.json);

        let config = args.config();
        assert_eq!(config.vus, 10);
        assert_eq!(config.duration, Duration::from_secs(120));
        assert_eq!(config.pause, Duration::from_millis(250));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_vus_fail_validation() {
        let cli = BotloadCli::try_parse_from(["botload", "run", "-u", "0"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config().validate(), Err(ConfigError::NoVirtualUsers));
    }

    #[test]
    fn malformed_duration_is_rejected() {
        assert!(BotloadCli::try_parse_from(["botload", "run", "-d", "soon"]).is_err());
    }

    #[test]
    fn predict_arguments() {
        let cli =
            BotloadCli::try_parse_from(["botload", "predict", r#"{"features": {}}"#]).unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.payload.as_deref(), Some(r#"{"features": {}}"#));
        if std::env::var_os("BOTLOAD_PREDICT_URL").is_none() {
            assert_eq!(args.url, DEFAULT_PREDICT_URL);
        }
    }
}
