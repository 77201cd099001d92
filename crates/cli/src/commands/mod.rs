//! Command implementations.
//!
//! Each command opens the store, mounts the views it needs, performs one
//! intent and renders the page the navigator ends on.

mod cart;
mod listing;
mod seed;

use std::io::Write;
use std::sync::Arc;

use teerex_core::Route;
use teerex_storefront::config::StorefrontConfig;
use teerex_storefront::store::{FileStore, SharedStore};
use teerex_storefront::views::pages::ThanksPage;
use teerex_storefront::{CartEvents, CartView, ListingView, Navigator, ViewSettings};
use tracing::debug;

use crate::Commands;
use crate::error::CliError;

/// Store handle, event channel and navigation for one invocation.
pub struct Session {
    pub store: SharedStore,
    pub events: CartEvents,
    pub settings: ViewSettings,
    pub nav: Navigator,
}

impl Session {
    /// Open the configured file store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file exists but cannot be read.
    pub fn open(config: &StorefrontConfig, start: Route) -> Result<Self, CliError> {
        let store = FileStore::open(&config.store_path).map_err(teerex_storefront::AppError::from)?;
        debug!(path = %store.path().display(), "Store opened");
        Ok(Self::with_store(Arc::new(store), config.view_settings(), start))
    }

    pub fn with_store(store: SharedStore, settings: ViewSettings, start: Route) -> Self {
        Self {
            store,
            events: CartEvents::default(),
            settings,
            nav: Navigator::new(start),
        }
    }

    pub fn listing(&self) -> ListingView {
        ListingView::mount(self.store.clone(), &self.events, &self.settings)
    }

    pub fn cart(&self) -> CartView {
        CartView::mount(self.store.clone(), &self.events, self.settings.clone())
    }
}

/// Run `command` against the configured store, rendering to `out`.
///
/// # Errors
///
/// Returns the command's error after the page (with any notice) is rendered.
pub fn run(command: Commands, config: &StorefrontConfig, out: &mut impl Write) -> Result<(), CliError> {
    let start = match command {
        Commands::Seed { .. } | Commands::Products | Commands::Add { .. } => Route::Listing,
        _ => Route::Cart,
    };
    let mut session = Session::open(config, start)?;
    execute(command, &mut session, out)
}

/// Run `command` in an open session.
///
/// # Errors
///
/// Returns the command's error after the page (with any notice) is rendered.
pub fn execute(command: Commands, session: &mut Session, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Commands::Seed { file } => seed::catalog(session, &file, out),
        Commands::Products => listing::show(session, out),
        Commands::Add { id } => listing::add(session, id, out),
        Commands::Cart => cart::show(session, out),
        Commands::Inc { id } => cart::increment(session, id, out),
        Commands::Dec { id } => cart::decrement(session, id, out),
        Commands::Remove { id } => cart::remove(session, id, out),
        Commands::Checkout { address } => cart::checkout(session, address, out),
    }
}

fn write_page(out: &mut impl Write, page: &str) -> Result<(), CliError> {
    writeln!(out, "{}", page.trim_end())?;
    Ok(())
}

fn write_thanks(out: &mut impl Write) -> Result<(), CliError> {
    let page = ThanksPage::default().text()?;
    write_page(out, &page)
}
