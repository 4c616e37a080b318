//! `botload` command line.
//!
//! ```text
//! $ botload run -t http://localhost:5000 -u 10 -d 2m
//! $ echo '{"features": {"hour": 14}}' | botload predict --url http://localhost:8000/predict
//! ```
mod cli;
mod error;
mod telemetry;

use botload::predict::PredictClient;
use botload::target::SessionTarget;
use botload::traffic::run_session_traffic;
use clap::Parser;
use cli::{BotloadCli, Command, PredictArgs, RunArgs};
use error::CliError;
use serde_json::json;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, instrument};

#[tokio::main]
async fn main() -> ExitCode {
    let args = BotloadCli::parse();

    if let Err(err) = telemetry::init(&args.log) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let res = match args.command {
        Command::Run(args) => run(args).await,
        Command::Predict(args) => predict(args).await,
    };

    match res {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: RunArgs) -> Result<ExitCode, CliError> {
    let config = args.config();
    config.validate()?;

    if let Some(addr) = args.metrics_addr {
        telemetry::install_prometheus(addr)?;
    }

    let target = SessionTarget::new(&args.target, args.timeout)?;
    let stats = run_session_traffic(target, config.clone()).await;

    if args.json {
        let summary = json!({ "config": config, "stats": stats });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{stats}");
    }

    Ok(ExitCode::SUCCESS)
}

#[instrument(skip_all, fields(url = %args.url))]
async fn predict(args: PredictArgs) -> Result<ExitCode, CliError> {
    let client = PredictClient::new(&args.url, args.timeout)?;

    let input = match args.payload {
        Some(payload) if payload != "-" => payload,
        _ => {
            debug!("Reading payload from stdin");
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };

    let outcome = client.submit(&input).await;
    println!("{outcome}");

    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
