//! Cafe Spot CLI - browse and manage the cafe directory.
//!
//! # Usage
//!
//! ```bash
//! # Insert the default administrator and example listings
//! cafe-spot seed
//!
//! # Create an account, or log in (the password is prompted for)
//! cafe-spot auth register -n "Ana" -e ana@example.com
//! cafe-spot auth login -e admin@cafespot.com
//!
//! # Browse
//! cafe-spot cafe list
//! cafe-spot cafe show <ID>
//!
//! # Manage listings (administrators only)
//! cafe-spot cafe save --name "Lua Alta Cafe" --cep 30110-012 --number 120 ...
//! cafe-spot cafe toggle-active <ID>
//! cafe-spot cafe delete <ID>
//!
//! # Like a listing (any logged-in user)
//! cafe-spot cafe like <ID>
//! ```
//!
//! # Commands
//!
//! - `seed` - Seed empty collections with default data
//! - `auth` - Register, log in, log out, show the session
//! - `cafe` - List, show, save, delete, toggle and like listings
//! - `cep lookup` - Resolve a postal code
//! - `mask-cnpj` - Format a CNPJ

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cafe_spot_app::{AppContext, AppError, config::AppConfig};

mod commands;
mod output;

use commands::cafe::CafeArgs;

#[derive(Parser)]
#[command(name = "cafe-spot")]
#[command(author, version, about = "Cafe Spot directory CLI")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed empty collections with the default administrator and listings
    Seed,
    /// Manage the session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse and manage listings
    Cafe {
        #[command(subcommand)]
        action: CafeAction,
    },
    /// Postal code tools
    Cep {
        #[command(subcommand)]
        action: CepAction,
    },
    /// Format a CNPJ as XX.XXX.XXX/XXXX-XX
    MaskCnpj {
        /// CNPJ, with or without separators
        value: String,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Create a client account and log in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 4 characters); prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in with an existing account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[derive(Subcommand)]
enum CafeAction {
    /// List the listings visible to the current session
    List,
    /// Show one listing
    Show {
        /// Listing ID
        id: String,
    },
    /// Create a listing, or update one with --id (administrators only)
    Save(CafeArgs),
    /// Delete a listing (administrators only)
    Delete {
        /// Listing ID
        id: String,
    },
    /// Activate or deactivate a listing (administrators only)
    ToggleActive {
        /// Listing ID
        id: String,
    },
    /// Like a listing, or take the like back
    Like {
        /// Listing ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CepAction {
    /// Resolve a postal code to an address
    Lookup {
        /// CEP, with or without the dash
        cep: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cafe_spot_app=info,cafe_spot_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(kind = ?e.kind(), "Command failed: {e}");
        std::process::exit(if e.is_recoverable() { 1 } else { 2 });
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let out = output::Output::new(cli.json);

    // Needs no storage.
    if let Commands::MaskCnpj { value } = &cli.command {
        out.masked_tax_id(&cafe_spot_core::validation::mask_tax_id(value));
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    let ctx = AppContext::from_config(config)?;
    let (report, session) = ctx.bootstrap().await?;

    match cli.command {
        Commands::Seed => out.seed_report(&report),
        Commands::Auth { action } => match action {
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&ctx, &out, name, email, password).await?,
            AuthAction::Login { email, password } => {
                commands::auth::login(&ctx, &out, &email, password).await?;
            }
            AuthAction::Logout => commands::auth::logout(&ctx, &out).await?,
            AuthAction::Whoami => out.session(session.as_ref()),
        },
        Commands::Cafe { action } => {
            let session = session.as_ref();
            match action {
                CafeAction::List => commands::cafe::list(&ctx, &out, session).await?,
                CafeAction::Show { id } => commands::cafe::show(&ctx, &out, session, &id).await?,
                CafeAction::Save(args) => commands::cafe::save(&ctx, &out, session, args).await?,
                CafeAction::Delete { id } => {
                    commands::cafe::delete(&ctx, &out, session, &id).await?;
                }
                CafeAction::ToggleActive { id } => {
                    commands::cafe::toggle_active(&ctx, &out, session, &id).await?;
                }
                CafeAction::Like { id } => commands::cafe::like(&ctx, &out, session, &id).await?,
            }
        }
        Commands::Cep { action } => match action {
            CepAction::Lookup { cep } => commands::cep::lookup(&ctx, &out, &cep).await?,
        },
        Commands::MaskCnpj { .. } => {}
    }
    Ok(())
}
