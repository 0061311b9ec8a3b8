//! Restock CLI - database migrations and management tools.
//!
//! ```bash
//! # Apply pending ops migrations
//! restock-cli migrate ops
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::migrate;

#[derive(Parser)]
#[command(name = "restock-cli", author, version, about = "Restock CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Apply pending ops migrations
    Ops,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();
    let outcome = match command {
        Command::Migrate {
            target: MigrateTarget::Ops,
        } => migrate::ops().await,
    };

    if let Err(e) = outcome {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}
