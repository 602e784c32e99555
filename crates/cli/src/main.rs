//! Lovosis CLI - database migrations, admin tokens and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending database migrations
//! lovosis-cli migrate
//!
//! # Mint an admin token valid for 12 hours
//! lovosis-cli admin token --subject ops@lovosis.in --hours 12
//!
//! # Load the catalog taxonomy from YAML, replacing what is there
//! lovosis-cli seed catalog catalog.yaml --clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin token` - Mint an admin JWT for the `/api/admin` endpoints
//! - `seed catalog` - Load navbar categories, categories, subcategories and products

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lovosis-cli")]
#[command(author, version, about = "Lovosis site CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Mint a signed admin token
    Token {
        /// Who the token is issued to (written into the `sub` claim)
        #[arg(short, long)]
        subject: String,

        /// Hours until the token expires
        #[arg(long, default_value_t = commands::admin::DEFAULT_TTL_HOURS)]
        hours: i64,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load the catalog taxonomy and products from a YAML file
    Catalog {
        /// Path to the YAML file
        file: String,

        /// Delete the existing catalog before loading
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Token { subject, hours } => {
                let token = commands::admin::mint_token(&subject, hours)?;
                #[allow(clippy::print_stdout)]
                {
                    println!("{token}");
                }
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, clear } => {
                commands::seed::catalog(&file, clear).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_admin_token_hours_default() {
        let cli = Cli::try_parse_from(["lovosis-cli", "admin", "token", "--subject", "ops"]);
        match cli.map(|c| c.command) {
            Ok(Commands::Admin {
                action: AdminAction::Token { subject, hours },
            }) => {
                assert_eq!(subject, "ops");
                assert_eq!(hours, commands::admin::DEFAULT_TTL_HOURS);
            }
            _ => panic!("expected admin token command"),
        }
    }

    #[test]
    fn test_seed_catalog_clear_flag() {
        let cli = Cli::try_parse_from(["lovosis-cli", "seed", "catalog", "catalog.yaml", "--clear"]);
        match cli.map(|c| c.command) {
            Ok(Commands::Seed {
                target: SeedTarget::Catalog { file, clear },
            }) => {
                assert_eq!(file, "catalog.yaml");
                assert!(clear);
            }
            _ => panic!("expected seed catalog command"),
        }
    }
}
