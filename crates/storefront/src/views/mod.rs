//! Views over the persisted store.
//!
//! - [`ListingView`] - product listing, adds products to the cart
//! - [`CartView`] - cart list, totals, delivery address and checkout
//! - [`CartItemView`] - one cart line and its increment/decrement/delete intents
//!
//! Views never share in-memory cart state. Each intent re-reads the store,
//! applies one cart engine operation, writes the result back and emits a
//! [`CartEvent`](crate::events::CartEvent); views that render the cart pick
//! the change up through their subscription.

mod cart;
mod cart_item;
mod listing;
pub mod pages;

use std::time::Duration;

use rust_decimal::Decimal;
use teerex_core::Currency;

use crate::cart::Cart;
use crate::notice::DEFAULT_NOTICE_WINDOW;
use crate::store::{PersistedStore, StoreError, keys, read_sequence, write_sequence};

pub use cart::CartView;
pub use cart_item::CartItemView;
pub use listing::ListingView;

/// Settings shared by every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// How long transient notices stay visible.
    pub notice_window: Duration,
    /// Currency tag shown next to totals.
    pub currency: Currency,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            notice_window: DEFAULT_NOTICE_WINDOW,
            currency: Currency::default(),
        }
    }
}

fn load_cart(store: &dyn PersistedStore) -> Result<Cart, StoreError> {
    read_sequence(store, keys::CART).map(Cart::from_lines)
}

fn save_cart(store: &dyn PersistedStore, cart: &Cart) -> Result<(), StoreError> {
    write_sequence(store, keys::CART, cart.lines())
}

/// Amount followed by the currency tag, e.g. `1000 INR`.
fn format_total(amount: Decimal, currency: &Currency) -> String {
    format!("{} {currency}", amount.normalize())
}
