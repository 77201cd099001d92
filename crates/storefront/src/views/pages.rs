//! Page templates.
//!
//! Plain-text renderings of the three pages, used by the command-line front
//! end.

use askama::Template;
use teerex_core::ProductId;

/// Product listing row.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub stock: u32,
    pub in_cart: u32,
}

/// Product listing page.
#[derive(Debug, Template)]
#[template(path = "listing.txt")]
pub struct ListingPage {
    pub rows: Vec<ProductRow>,
    pub cart_count: u64,
    pub notice: Option<String>,
}

/// Cart line row.
#[derive(Debug, Clone)]
pub struct CartRow {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: String,
    pub qty: u32,
    pub line_total: String,
    pub notice: Option<String>,
}

/// Cart page.
#[derive(Debug, Template)]
#[template(path = "cart.txt")]
pub struct CartPage {
    pub rows: Vec<CartRow>,
    pub item_count: u64,
    pub total: String,
    pub address: String,
    pub notice: Option<String>,
}

/// Thank-you page shown after checkout.
#[derive(Debug, Default, Template)]
#[template(path = "thanks.txt")]
pub struct ThanksPage {}

impl ThanksPage {
    /// Render the page as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn text(&self) -> crate::error::Result<String> {
        Ok(self.render()?)
    }
}
