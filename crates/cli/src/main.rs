//! Emporium CLI - catalog lookups and form checks from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the view model the product page would render
//! emporium-cli product 42
//!
//! # List the home page listings
//! emporium-cli new-arrivals
//! emporium-cli deals
//!
//! # Run the registration rules against some input
//! emporium-cli check-registration -n "Ada" -e ada@example.com -p secret1 -c secret1
//! ```
//!
//! # Commands
//!
//! - `product` - Fetch and map one product plus related products
//! - `new-arrivals` / `deals` - List a canned listing
//! - `check-registration` - Validate a signup form and simulate the signup

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use clap::{Parser, Subcommand};
use emporium_storefront::api::ApiClient;
use emporium_storefront::config::{StorefrontConfig, parse_api_url};
use emporium_storefront::forms::registration::RegistrationForm;

mod commands;

use commands::CliError;
use commands::catalog::Listing;

#[derive(Parser)]
#[command(name = "emporium-cli")]
#[command(author, version, about = "Emporium CLI tools")]
struct Cli {
    /// Backend API base URL (overrides `STOREFRONT_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a product and show its view model
    Product {
        /// Product id
        id: String,
    },
    /// List new arrivals
    NewArrivals,
    /// List deals
    Deals,
    /// Validate a registration form
    CheckRegistration {
        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(short, long, default_value = "")]
        email: String,

        #[arg(short, long, default_value = "")]
        password: String,

        /// Password confirmation
        #[arg(short, long, default_value = "")]
        confirm: String,

        /// Skip the simulated signup delay
        #[arg(long)]
        no_delay: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(raw) = cli.api_url.as_deref() {
        config.api_url = parse_api_url(raw)?;
    }
    let api = ApiClient::new(config.api_url.clone());

    match cli.command {
        Commands::Product { id } => commands::catalog::product(&api, &id).await?,
        Commands::NewArrivals => commands::catalog::listing(&api, Listing::NewArrivals).await?,
        Commands::Deals => commands::catalog::listing(&api, Listing::Deals).await?,
        Commands::CheckRegistration {
            name,
            email,
            password,
            confirm,
            no_delay,
        } => {
            let form = RegistrationForm {
                name,
                email,
                password,
                confirm_password: confirm,
            };
            let delay = if no_delay {
                Duration::ZERO
            } else {
                config.registration_delay
            };
            commands::registration::check(form, delay).await?;
        }
    }
    Ok(())
}
