use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use localkit::Launcher;
use localkit::cli::Cli;
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config();
    let launcher = Launcher::from_config(config).context("loading root environment")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();

    launcher.run(&mut input, &mut output)?;
    Ok(())
}
