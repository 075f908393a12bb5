use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use hetzname::cli::Args;
use hetzname::config::Config;
use hetzname::error::redact_secrets;
use hetzname::sync;

//==============================================================================
// Main
//==============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        // Nothing to do; show usage but report failure so scripts notice
        Args::command().print_help().ok();
        return ExitCode::FAILURE;
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print().ok();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let config = match Config::load(args) {
        Ok(config) => config,
        Err(err) => {
            let token = std::env::var(hetzname::constants::ENV_API_TOKEN).unwrap_or_default();
            eprintln!("hetzname: {}", redact_secrets(&err.to_string(), &token));
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if config.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match sync::run(&config).await {
        Ok(outcome) => {
            println!("{}", outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!(
                "hetzname: {}",
                redact_secrets(&err.to_string(), config.api_token.as_str())
            );
            ExitCode::FAILURE
        }
    }
}
