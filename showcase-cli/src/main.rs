//! showcase-sync: copy showcases from one catalog instance to another.
//!
//! # Usage
//!
//! ```text
//! showcase-sync --source <url> --target <url> --target-key <key>
//!               [--tmp-dir <path>] [--showcase <name>] [--dry-run] [--timeout <secs>]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr, the
//! summary to stdout.

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "showcase-sync",
    version,
    about = "Synchronize showcases and their dataset associations between two catalog instances",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.sync.run()
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
