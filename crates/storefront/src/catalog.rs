//! Read-only product catalog.

use teerex_core::{Product, ProductId};

use crate::store::{PersistedStore, StoreError, keys, read_sequence, write_sequence};

/// The collection of purchasable products and their stock levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog key. A missing or malformed catalog is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend fails.
    pub fn load(store: &dyn PersistedStore) -> Result<Self, StoreError> {
        read_sequence(store, keys::CATALOG).map(Self::new)
    }

    /// Write this catalog to the catalog key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend fails.
    pub fn save(&self, store: &dyn PersistedStore) -> Result<(), StoreError> {
        write_sequence(store, keys::CATALOG, &self.products)
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Available stock for `id`, or `None` if the product is unknown.
    #[must_use]
    pub fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.find(id).map(|p| p.quantity)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
