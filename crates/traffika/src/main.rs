// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traffika - affiliate-marketing operations bot.
//!
//! This is the binary entry point.

mod serve;

use clap::{Parser, Subcommand};

/// Traffika - affiliate-marketing operations bot.
#[derive(Parser, Debug)]
#[command(name = "traffika", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Print the effective merged configuration.
    Config,
}

#[tokio::main]
async fn main() {
    // Load and validate configuration at startup.
    let config = match traffika_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            traffika_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli_command() {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            serve::print_config(&config);
        }
        None => {
            println!("traffika: use --help for available commands");
        }
    }
}

fn cli_command() -> Option<Commands> {
    Cli::parse().command
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = traffika_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "traffika");
    }
}
