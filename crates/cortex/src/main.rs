// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cortex -- temporal knowledge graph orchestration service.
//!
//! This is the binary entry point for the Cortex server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;

/// Cortex -- temporal knowledge graph orchestration service.
#[derive(Parser, Debug)]
#[command(name = "cortex", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Cortex HTTP server.
    Serve {
        /// Path to a TOML config file; defaults to the XDG hierarchy.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { config }) => {
            let loaded = match config {
                Some(path) => cortex_config::load_and_validate_path(&path),
                None => cortex_config::load_and_validate(),
            };
            let config = match loaded {
                Ok(config) => config,
                Err(errors) => {
                    cortex_config::render_errors(&errors);
                    std::process::exit(1);
                }
            };
            if let Err(err) = serve::run_serve(config).await {
                eprintln!("cortex serve failed: {err}");
                std::process::exit(1);
            }
        }
        None => {
            println!("cortex: use --help for available commands");
        }
    }
}
