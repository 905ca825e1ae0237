mod args;
mod runner;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use args::{Cli, Commands};
use runner::run_scan;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan {
            ranges,
            workers,
            threads,
            cutoff,
            chunk_size,
            check_funds,
            webhook_url,
            timeout,
            proxy_file,
        } => {
            run_scan(
                ranges,
                workers,
                threads,
                cutoff,
                chunk_size,
                check_funds,
                webhook_url,
                timeout,
                proxy_file,
            )
            .await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
