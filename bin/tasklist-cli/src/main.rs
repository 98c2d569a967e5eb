//! tasklist – terminal front end for the tasklist server.

mod cli;
mod commands;
mod view;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tasklist_client::TaskClient;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tasklist error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let client = TaskClient::new(&cli.server)
        .with_context(|| format!("cannot use server address {}", cli.server))?;
    commands::dispatch(cli.command, &client).await
}

/// Logs go to stderr so command output stays pipeable. `RUST_LOG` wins over
/// the verbosity flag.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
