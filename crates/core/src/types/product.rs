//! Catalog products and cart lines as they are persisted.
//!
//! Field names follow the stored records (`cost`, `qty`, `quantity`), so a
//! catalog written by the listing page deserializes without a mapping layer.
//! Costs are serialized as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Currency, Price};

/// A read-only catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(default)]
    pub image: String,
    /// Available stock.
    pub quantity: u32,
    #[serde(default)]
    pub currency: Currency,
}

impl Product {
    /// Unit price with this product's currency.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::new(self.cost, self.currency.clone())
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// One product's entry in the cart.
///
/// `name`, `cost` and `image` are copied from the [`Product`] when the line is
/// created and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(default)]
    pub image: String,
    pub qty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

impl CartLine {
    /// Create a line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            cost: product.cost,
            image: product.image.clone(),
            qty: 1,
            currency: Some(product.currency.clone()),
        }
    }

    /// `qty × cost` for this line, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.cost.saturating_mul(Decimal::from(self.qty))
    }
}
