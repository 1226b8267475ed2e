//! Store admin CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! sa-cli migrate
//!
//! # Create an owner who can sign in to the dashboard
//! sa-cli owner create -e owner@example.com -n "Owner Name" -p "long password"
//!
//! # Create a store for an existing owner
//! sa-cli store create -e owner@example.com -n "Main Street"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `owner create` - Create owners
//! - `store create` - Create stores

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sa-cli")]
#[command(author, version, about = "Store admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage owners
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Create a new owner
    Create {
        /// Owner email address
        #[arg(short, long)]
        email: String,

        /// Owner display name
        #[arg(short, long)]
        name: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create a store owned by an existing owner
    Create {
        /// Email of the owning account
        #[arg(short, long)]
        email: String,

        /// Store name
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before tracing so RUST_LOG from the file applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Owner { action } => match action {
            OwnerAction::Create {
                email,
                name,
                password,
            } => {
                commands::owner::create(&email, &name, &password).await?;
            }
        },
        Commands::Store { action } => match action {
            StoreAction::Create { email, name } => {
                commands::store::create(&email, &name).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_owner_create() {
        let cli = Cli::try_parse_from([
            "sa-cli", "owner", "create", "-e", "a@b.co", "-n", "Ann", "-p", "password1",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Owner {
                action: OwnerAction::Create { .. }
            })
        ));
    }

    #[test]
    fn test_store_create_requires_name() {
        assert!(Cli::try_parse_from(["sa-cli", "store", "create", "-e", "a@b.co"]).is_err());
    }
}
