//! Till exchanger
//!
//! Reads per-location cash amounts from a batch file, breaks each into bills
//! and prints the combined report as JSON on stdout.
//!
//! Usage: till [BATCH_FILE]

mod batch;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use till_core::exchange::{BandPolicy, ExchangeService};
use till_shared::config::LoggingConfig;
use till_shared::{AppConfig, AppError};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            error!(error = %err, "exchange failed");
            eprintln!("till: {err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;
    init_tracing(&config.logging);

    let batch_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.exchange.batch_file.clone());

    let policy = match &config.exchange.policy_file {
        Some(path) => {
            info!(path = %path, "loading band policy");
            batch::load_policy(path)?
        }
        None => BandPolicy::standard(),
    };

    let requests = batch::load_batch(&batch_path)?;
    info!(path = %batch_path, locations = requests.len(), "batch loaded");

    let report = ExchangeService::new(policy).run(&requests);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
