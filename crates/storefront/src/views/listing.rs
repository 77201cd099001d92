use askama::Template;
use teerex_core::{Product, ProductId};
use tracing::{debug, error, info, instrument, warn};

use super::pages::{ListingPage, ProductRow};
use super::{ViewSettings, load_cart, save_cart};
use crate::cart::CartError;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::events::{CartEvent, CartEvents, LineChange};
use crate::notice::NoticeBoard;
use crate::store::SharedStore;

/// The product listing page.
///
/// Owns the catalog key: it publishes the catalog and appends products to
/// the cart.
#[derive(Debug)]
pub struct ListingView {
    store: SharedStore,
    events: CartEvents,
    catalog: Catalog,
    notice: NoticeBoard,
}

impl ListingView {
    /// Mount the view, loading the catalog from the store.
    #[must_use]
    pub fn mount(store: SharedStore, events: &CartEvents, settings: &ViewSettings) -> Self {
        let catalog = Catalog::load(store.as_ref()).unwrap_or_else(|e| {
            error!(error = %e, "Failed to read catalog, listing nothing");
            Catalog::default()
        });
        Self {
            store,
            events: events.clone(),
            catalog,
            notice: NoticeBoard::new(settings.notice_window),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn notice(&self) -> &NoticeBoard {
        &self.notice
    }

    /// Replace the stored catalog.
    ///
    /// # Errors
    ///
    /// Returns a store error if the catalog cannot be written.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub fn publish_catalog(&mut self, products: Vec<Product>) -> Result<()> {
        let catalog = Catalog::new(products);
        catalog.save(self.store.as_ref())?;
        info!("Catalog published");
        self.catalog = catalog;
        Ok(())
    }

    /// Add one unit of `id` to the cart.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown id, `StockLimitReached` (also shown
    /// as a notice) when no more stock is available, or a store error.
    #[instrument(skip(self))]
    pub fn add_to_cart(&self, id: ProductId) -> Result<u32> {
        let Some(product) = self.catalog.find(id) else {
            warn!(product_id = %id, "Add of unknown product");
            return Err(CartError::ProductNotFound(id).into());
        };

        let mut cart = load_cart(self.store.as_ref())?;
        let existed = cart.get(id).is_some();
        let qty = match cart.add_product(product) {
            Ok(qty) => qty,
            Err(err) => {
                debug!(error = %err, "Add rejected");
                self.notice.show(err.to_string());
                return Err(err.into());
            }
        };

        save_cart(self.store.as_ref(), &cart)?;
        self.events.emit(CartEvent::Line {
            product_id: id,
            change: if existed {
                LineChange::Incremented
            } else {
                LineChange::Added
            },
        });
        Ok(qty)
    }

    /// Render data for the page.
    ///
    /// # Errors
    ///
    /// Returns a store error if the cart cannot be read.
    pub fn page(&self) -> Result<ListingPage> {
        let cart = load_cart(self.store.as_ref())?;
        let rows = self
            .catalog
            .products()
            .iter()
            .map(|product| ProductRow {
                id: product.id,
                name: product.name.clone(),
                price: product.price().to_string(),
                stock: product.quantity,
                in_cart: cart.get(product.id).map_or(0, |line| line.qty),
            })
            .collect();

        Ok(ListingPage {
            rows,
            cart_count: cart.item_count(),
            notice: self.notice.message(),
        })
    }

    /// Render the page as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read or the template fails.
    pub fn render(&self) -> Result<String> {
        Ok(self.page()?.render()?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use teerex_core::{CartLine, Currency};

    use super::*;
    use crate::error::AppError;
    use crate::store::{MemoryStore, keys, read_sequence};

    fn product(id: i32, quantity: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tee {id}"),
            cost: Decimal::from(500),
            image: String::new(),
            quantity,
            currency: Currency::default(),
        }
    }

    fn mounted(products: Vec<Product>) -> (Arc<MemoryStore>, CartEvents, ListingView) {
        let store = Arc::new(MemoryStore::new());
        let events = CartEvents::default();
        let mut view = ListingView::mount(store.clone(), &events, &ViewSettings::default());
        view.publish_catalog(products).unwrap();
        (store, events, view)
    }

    #[test]
    fn test_publish_catalog_is_visible_to_new_views() {
        let (store, events, _) = mounted(vec![product(1, 2), product(2, 3)]);
        let view = ListingView::mount(store, &events, &ViewSettings::default());
        assert_eq!(view.products().len(), 2);
    }

    #[test]
    fn test_add_to_cart_appends_then_increments() {
        let (store, events, view) = mounted(vec![product(1, 2)]);
        let mut subscription = events.subscribe();

        assert_eq!(view.add_to_cart(ProductId::new(1)).unwrap(), 1);
        assert_eq!(view.add_to_cart(ProductId::new(1)).unwrap(), 2);

        let stored: Vec<CartLine> = read_sequence(store.as_ref(), keys::CART).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].qty, 2);

        let changes: Vec<_> = subscription
            .drain()
            .into_iter()
            .map(|event| match event {
                CartEvent::Line { change, .. } => Some(change),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![Some(LineChange::Added), Some(LineChange::Incremented)]
        );
    }

    #[test]
    fn test_add_beyond_stock_shows_notice() {
        let (_, _, view) = mounted(vec![product(1, 1), product(2, 0)]);
        view.add_to_cart(ProductId::new(1)).unwrap();

        let err = view.add_to_cart(ProductId::new(1)).unwrap_err();
        assert!(err.is_user_facing());
        assert!(view.add_to_cart(ProductId::new(2)).is_err());
        assert_eq!(
            view.notice().message().as_deref(),
            Some("Cannot add more products. Available stock limit reached.")
        );
    }

    #[test]
    fn test_add_unknown_product() {
        let (_, _, view) = mounted(vec![product(1, 1)]);
        let err = view.add_to_cart(ProductId::new(9)).unwrap_err();
        assert!(matches!(err, AppError::Cart(CartError::ProductNotFound(_))));
        assert!(view.notice().message().is_none());
    }

    #[test]
    fn test_render_listing() {
        let (_, _, view) = mounted(vec![product(1, 2), product(2, 0)]);
        view.add_to_cart(ProductId::new(1)).unwrap();

        let text = view.render().unwrap();
        assert!(text.contains("[1] Tee 1"));
        assert!(text.contains("INR 500"));
        assert!(text.contains("In cart: 1"));
        assert!(text.contains("Out of stock"));
    }
}
