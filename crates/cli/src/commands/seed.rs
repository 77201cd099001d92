//! Load the product catalog from a file.
//!
//! The file holds a list of product records, either as JSON (`.json`) or as
//! YAML (anything else):
//!
//! ```yaml
//! - id: 1
//!   name: Black Polo
//!   cost: 250
//!   image: https://example.com/polo.png
//!   quantity: 3
//!   currency: INR
//! ```

use std::io::Write;
use std::path::Path;

use teerex_core::Product;
use tracing::info;

use super::{Session, write_page};
use crate::error::CliError;

/// Parse a catalog file without touching the store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_catalog_file(path: &Path) -> Result<Vec<Product>, CliError> {
    let raw = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let products = if is_json {
        serde_json::from_str(&raw)?
    } else {
        serde_yaml::from_str(&raw)?
    };
    Ok(products)
}

/// Publish the catalog in `path` and render the listing.
pub fn catalog(session: &mut Session, path: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let products = read_catalog_file(path)?;
    info!(path = %path.display(), products = products.len(), "Seeding catalog");

    let mut listing = session.listing();
    listing.publish_catalog(products)?;
    write_page(out, &listing.render()?)
}
