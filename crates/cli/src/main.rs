//! Herbal Glow CLI - Database migrations and store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the users and sessions tables
//! hg-cli migrate
//!
//! # Create an empty users file for the file backend
//! hg-cli init-store --path data/users.json
//!
//! # List users in the configured backend
//! hg-cli users list
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `init-store` - Initialise the file store
//! - `users list` - Print stored users

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hg-cli")]
#[command(author, version, about = "Herbal Glow CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (users table and session store)
    Migrate,
    /// Create an empty users file if none exists
    InitStore {
        /// Users file (defaults to `STOREFRONT_USERS_FILE` or data/users.json)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Inspect stored users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List users in the configured backend, oldest first
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::InitStore { path } => commands::store::init(path).await?,
        Commands::Users { action } => match action {
            UsersAction::List => commands::users::list().await?,
        },
    }
    Ok(())
}
