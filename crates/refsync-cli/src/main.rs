//! refsync CLI
//!
//! Scans files for reference blocks and replaces their bodies with the
//! current contents of the referenced local or remote resources.

mod cli;
mod error;
mod runner;

use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .init();

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("cancellation requested");
            signal_cancel.cancel();
        }
    });

    let summary = match runner::run(&cli.paths, cli.recurse, cli.end_of_line.into(), cancel).await
    {
        Ok(summary) => summary,
        Err(error) => {
            eprintln!("{}: {}", "error".red().bold(), error);
            std::process::exit(1);
        }
    };

    println!(
        "{} updated, {} up to date, {} failed",
        summary.updated.to_string().green().bold(),
        summary.up_to_date,
        if summary.failed > 0 {
            summary.failed.to_string().red().bold().to_string()
        } else {
            summary.failed.to_string()
        }
    );

    if summary.failed > 0 || summary.cancelled {
        std::process::exit(1);
    }
}
