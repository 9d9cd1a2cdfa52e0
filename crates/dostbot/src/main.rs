// SPDX-FileCopyrightText: 2026 Dostbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dostbot - a Hinglish Telegram chat bot backed by OpenRouter.
//!
//! This is the binary entry point for the bot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Dostbot - a Hinglish Telegram chat bot backed by OpenRouter.
#[derive(Parser, Debug)]
#[command(name = "dostbot", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the XDG hierarchy lookup.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot (long polling). The default when no subcommand is given.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => dostbot_config::load_and_validate_path(path),
        None => dostbot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            dostbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(err) => {
                error!(error = %err, "failed to render configuration");
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            if let Err(err) = serve::run(config).await {
                error!(error = %err, "bot exited with error");
                std::process::exit(1);
            }
        }
    }
}
