//! Integration tests for the TeeRex store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p teerex-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart and line-item views over a shared store
//! - `checkout` - Checkout validation, reset and navigation
//! - `persistence` - File-backed store across reopen
//!
//! This library holds the fixtures the test files share.

use std::sync::Arc;

use rust_decimal::Decimal;
use teerex_core::{CartLine, Currency, Product, ProductId};
use teerex_storefront::Catalog;
use teerex_storefront::store::{MemoryStore, keys, read_sequence, write_sequence};

/// A catalog product costing `cost` with `quantity` in stock.
#[must_use]
pub fn product(id: i32, name: &str, cost: i64, quantity: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        cost: Decimal::from(cost),
        image: format!("https://cdn.example.com/{id}.png"),
        quantity,
        currency: Currency::default(),
    }
}

/// A cart line for `product` holding `qty` units.
#[must_use]
pub fn line(product: &Product, qty: u32) -> CartLine {
    CartLine {
        qty,
        ..CartLine::from_product(product)
    }
}

/// An in-memory store holding `catalog` and `cart`.
///
/// # Panics
///
/// Panics if the fixtures cannot be written.
#[must_use]
pub fn memory_store(catalog: &[Product], cart: &[CartLine]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    Catalog::new(catalog.to_vec())
        .save(store.as_ref())
        .expect("write catalog fixture");
    write_sequence(store.as_ref(), keys::CART, cart).expect("write cart fixture");
    store
}

/// The cart lines currently stored.
///
/// # Panics
///
/// Panics if the store cannot be read.
#[must_use]
pub fn stored_cart(store: &MemoryStore) -> Vec<CartLine> {
    read_sequence(store, keys::CART).expect("read cart")
}
