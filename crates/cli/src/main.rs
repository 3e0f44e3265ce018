use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dataentry_cli::config::{CliConfig, LogFormat};
use dataentry_cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(dataentry_cli::EXIT_ERROR);
        }
    };
    init_tracing(config.log_format);

    let result = dataentry_cli::execute(&args, &config);
    ExitCode::from(dataentry_cli::exit_status(&result, &mut std::io::stderr()))
}

/// Logs go to stderr; stdout carries only results.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dataentry_cli=info,dataentry_core=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
