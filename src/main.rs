use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use typesort::cli::{Cli, log_level, run_cli};
use typesort::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level(cli.verbose).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_cli(&cli) {
        Ok(outcome) if outcome.summary().failed > 0 => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
