//! TeeRex CLI - Command-line front end for the TeeRex store.
//!
//! # Usage
//!
//! ```bash
//! # Load the catalog
//! teerex seed catalog.yaml
//!
//! # Browse and fill the cart
//! teerex products
//! teerex add 1
//! teerex inc 1
//! teerex dec 1
//! teerex remove 1
//!
//! # Show the cart and place the order
//! teerex cart
//! teerex checkout --address "42 Residency Road, Pune"
//! ```
//!
//! Every command prints the page it leaves the store on. A rejected intent
//! (stock limit, checkout rule) prints the page with its notice and exits
//! with status 1; store and configuration failures exit with status 2.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use teerex_core::ProductId;
use teerex_storefront::config::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "teerex")]
#[command(author, version, about = "TeeRex store from the command line")]
struct Cli {
    /// Store file (overrides `TEEREX_STORE_PATH`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the product catalog from a YAML or JSON file
    Seed {
        /// Catalog file; `.json` is read as JSON, anything else as YAML
        file: PathBuf,
    },
    /// Show the product listing
    Products,
    /// Add one unit of a product to the cart
    Add { id: ProductId },
    /// Show the cart
    Cart,
    /// Increment a cart line
    Inc { id: ProductId },
    /// Decrement a cart line (removes it at zero)
    Dec { id: ProductId },
    /// Remove a cart line
    Remove { id: ProductId },
    /// Validate the cart and place the order
    Checkout {
        /// Delivery address (at least 20 characters)
        #[arg(short, long, default_value = "")]
        address: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the rendered pages.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "teerex_storefront=info,teerex_cli=info".into());

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(path) = cli.store {
        config.store_path = path;
    }

    // Sentry must be initialized before the tracing subscriber. The guard
    // flushes pending events when it drops at the end of main.
    let _sentry_guard = init_sentry(&config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut out = io::stdout().lock();
    match commands::run(cli.command, &config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_user_facing() {
                tracing::error!("Command failed: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}
