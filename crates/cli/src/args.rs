use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yantra")]
#[command(version = "0.1.0")]
#[command(about = "Worker-pool coordinator for identifier-space scans", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    Scan {
        /// Identifier range to scan, START-END (half-open). Repeatable.
        #[arg(short = 'r', long = "range", required = true)]
        ranges: Vec<String>,

        /// Number of workers
        #[arg(short, long, default_value = "4")]
        workers: usize,

        /// Scan threads per worker
        #[arg(short, long, default_value = "16")]
        threads: usize,

        /// Skip identifiers below this cutoff
        #[arg(long, default_value = "0")]
        cutoff: u64,

        /// Identifiers claimed per batch
        #[arg(long, default_value = "100")]
        chunk_size: u64,

        /// Perform the fund check on hits
        #[arg(long)]
        check_funds: bool,

        /// Webhook notified on hits
        #[arg(long)]
        webhook_url: Option<String>,

        /// Per-request timeout in milliseconds
        #[arg(long, default_value = "5000")]
        timeout: u64,

        /// Proxy list, one host:port per line. Omit to connect directly.
        #[arg(short = 'p', long)]
        proxy_file: Option<PathBuf>,
    },
}
