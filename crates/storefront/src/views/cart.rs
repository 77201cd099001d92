use std::collections::HashMap;

use askama::Template;
use rust_decimal::Decimal;
use teerex_core::{ProductId, Route};
use tracing::{error, info, instrument, warn};

use super::pages::CartPage;
use super::{CartItemView, ViewSettings, format_total, load_cart};
use crate::cart::{Cart, CartError};
use crate::checkout::validate_checkout;
use crate::error::Result;
use crate::events::{CartEvent, CartEvents, CartSubscription};
use crate::navigation::Navigator;
use crate::notice::NoticeBoard;
use crate::store::{SharedStore, reset_all};

/// The cart page: line items, order summary and checkout.
#[derive(Debug)]
pub struct CartView {
    store: SharedStore,
    events: CartEvents,
    subscription: CartSubscription,
    settings: ViewSettings,
    cart: Cart,
    total: Decimal,
    items: Vec<CartItemView>,
    address: String,
    notice: NoticeBoard,
}

impl CartView {
    /// Mount the view, loading the cart from the store.
    ///
    /// A cart that cannot be read mounts as empty.
    #[must_use]
    pub fn mount(store: SharedStore, events: &CartEvents, settings: ViewSettings) -> Self {
        let notice = NoticeBoard::new(settings.notice_window);
        let mut view = Self {
            store,
            events: events.clone(),
            subscription: events.subscribe(),
            settings,
            cart: Cart::new(),
            total: Decimal::ZERO,
            items: Vec::new(),
            address: String::new(),
            notice,
        };
        view.refresh();
        view
    }

    /// Re-read the cart from the store and recompute the total.
    ///
    /// On a store failure the previous state is kept.
    pub fn refresh(&mut self) {
        match load_cart(self.store.as_ref()) {
            Ok(cart) => self.apply(cart),
            Err(e) => error!(error = %e, "Failed to read cart, keeping previous state"),
        }
    }

    /// Refresh if any cart event arrived since the last sync.
    ///
    /// Returns whether a refresh happened.
    pub fn sync(&mut self) -> bool {
        if self.subscription.drain().is_empty() {
            return false;
        }
        self.refresh();
        true
    }

    fn apply(&mut self, cart: Cart) {
        // Line notices outlive the snapshot they were raised on.
        let mut notices: HashMap<ProductId, NoticeBoard> = self
            .items
            .drain(..)
            .map(|item| (item.id(), item.notice().clone()))
            .collect();

        self.items = cart
            .lines()
            .iter()
            .map(|line| {
                let notice = notices
                    .remove(&line.id)
                    .unwrap_or_else(|| NoticeBoard::new(self.settings.notice_window));
                CartItemView::new(
                    line.clone(),
                    self.store.clone(),
                    self.events.clone(),
                    notice,
                )
            })
            .collect();
        self.total = cart.total();
        self.cart = cart;
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Σ qty × cost over the rendered lines.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    #[must_use]
    pub fn items(&self) -> &[CartItemView] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, id: ProductId) -> Option<&CartItemView> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Order-level notice area (checkout messages).
    #[must_use]
    pub const fn notice(&self) -> &NoticeBoard {
        &self.notice
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    /// Increment the line for `id` and refresh.
    ///
    /// # Errors
    ///
    /// See [`CartItemView::increment`]; `LineNotFound` if `id` is not rendered.
    pub fn increment(&mut self, id: ProductId) -> Result<()> {
        self.sync();
        let result = self.rendered(id)?.increment();
        self.sync();
        result
    }

    /// Decrement the line for `id` and refresh.
    ///
    /// # Errors
    ///
    /// See [`CartItemView::decrement`]; `LineNotFound` if `id` is not rendered.
    pub fn decrement(&mut self, id: ProductId) -> Result<()> {
        self.sync();
        let result = self.rendered(id)?.decrement();
        self.sync();
        result
    }

    /// Delete the line for `id` and refresh. Absent lines are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a store error if the cart cannot be read or written.
    pub fn remove(&mut self, id: ProductId) -> Result<()> {
        self.sync();
        let Some(item) = self.item(id) else {
            return Ok(());
        };
        let result = item.delete();
        self.sync();
        result
    }

    fn rendered(&self, id: ProductId) -> Result<&CartItemView> {
        self.item(id).ok_or_else(|| {
            warn!(product_id = %id, "Intent on a line that is not rendered");
            CartError::LineNotFound(id).into()
        })
    }

    /// Validate and place the order.
    ///
    /// On success every store key is reset to an empty sequence and the
    /// navigator moves to the confirmation page. On a validation failure the
    /// rule is shown as a notice and nothing else changes.
    ///
    /// # Errors
    ///
    /// The first violated checkout rule, or a store error while resetting.
    #[instrument(skip(self, nav), fields(lines = self.cart.len()))]
    pub fn checkout(&mut self, nav: &mut Navigator) -> Result<()> {
        self.sync();

        if let Err(err) = validate_checkout(&self.cart, &self.address) {
            warn!(error = %err, "Checkout rejected");
            self.notice.show(err.to_string());
            return Err(err.into());
        }

        let reset = reset_all(self.store.as_ref())?;
        info!(keys = reset, "Order placed, store reset");

        self.events.emit(CartEvent::Cleared);
        self.subscription.drain();
        self.apply(Cart::new());
        self.address.clear();
        self.notice.dismiss();
        nav.navigate(Route::Confirmation);
        Ok(())
    }

    /// Render data for the page.
    #[must_use]
    pub fn page(&self) -> CartPage {
        CartPage {
            rows: self
                .items
                .iter()
                .map(|item| item.row(&self.settings.currency))
                .collect(),
            item_count: self.cart.item_count(),
            total: format_total(self.total, &self.settings.currency),
            address: self.address.clone(),
            notice: self.notice.message(),
        }
    }

    /// Render the page as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(&self) -> Result<String> {
        Ok(self.page().render()?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use teerex_core::{CartLine, Currency, Product};

    use super::*;
    use crate::catalog::Catalog;
    use crate::checkout::CheckoutError;
    use crate::error::AppError;
    use crate::store::{MemoryStore, PersistedStore, keys, read_sequence, write_sequence};

    fn product(id: i32, cost: i64, quantity: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tee {id}"),
            cost: Decimal::from(cost),
            image: String::new(),
            quantity,
            currency: Currency::default(),
        }
    }

    fn line(id: i32, cost: i64, qty: u32) -> CartLine {
        CartLine {
            qty,
            ..CartLine::from_product(&product(id, cost, 0))
        }
    }

    fn setup(catalog: Vec<Product>, cart: Vec<CartLine>) -> (Arc<MemoryStore>, CartEvents) {
        let store = Arc::new(MemoryStore::new());
        Catalog::new(catalog).save(store.as_ref()).unwrap();
        write_sequence(store.as_ref(), keys::CART, &cart).unwrap();
        (store, CartEvents::default())
    }

    fn stored_cart(store: &MemoryStore) -> Vec<CartLine> {
        read_sequence(store, keys::CART).unwrap()
    }

    #[test]
    fn test_mount_computes_total() {
        let (store, events) = setup(
            vec![product(1, 500, 5), product(2, 250, 5)],
            vec![line(1, 500, 2), line(2, 250, 1)],
        );
        let view = CartView::mount(store, &events, ViewSettings::default());

        assert_eq!(view.items().len(), 2);
        assert_eq!(view.total(), Decimal::from(1250));
    }

    #[test]
    fn test_mount_with_malformed_cart_is_empty() {
        let store = Arc::new(MemoryStore::with_entries([(keys::CART, "{\"oops\": true}")]));
        let view = CartView::mount(store, &CartEvents::default(), ViewSettings::default());
        assert!(view.cart().is_empty());
        assert_eq!(view.total(), Decimal::ZERO);
    }

    #[test]
    fn test_render_with_huge_quantities() {
        let (store, events) = setup(
            vec![product(1, 1, 5), product(2, 1, 5)],
            vec![line(1, 1, u32::MAX), line(2, 1, u32::MAX)],
        );
        let view = CartView::mount(store, &events, ViewSettings::default());

        let text = view.render().unwrap();
        assert!(text.contains("Cart (8589934590)"));
        assert!(text.contains("Total Cart Value: 8589934590 INR"));
    }

    #[test]
    fn test_intent_sees_line_added_elsewhere() {
        let (store, events) = setup(vec![product(1, 500, 5)], vec![]);
        let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());

        let mut cart = Cart::new();
        cart.add_product(&product(1, 500, 5)).unwrap();
        write_sequence(store.as_ref(), keys::CART, cart.lines()).unwrap();
        events.emit(CartEvent::Line {
            product_id: ProductId::new(1),
            change: crate::events::LineChange::Added,
        });

        view.increment(ProductId::new(1)).unwrap();
        assert_eq!(stored_cart(&store)[0].qty, 2);
        assert_eq!(view.total(), Decimal::from(1000));
    }

    #[test]
    fn test_item_intent_refreshes_list_through_events() {
        let (store, events) = setup(vec![product(1, 500, 5)], vec![line(1, 500, 1)]);
        let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());

        // Act through a detached item view, as a line-item row would.
        let item = view.item(ProductId::new(1)).unwrap().clone();
        item.increment().unwrap();
        assert_eq!(view.total(), Decimal::from(500));

        assert!(view.sync());
        assert_eq!(view.total(), Decimal::from(1000));
        assert_eq!(stored_cart(&store), view.cart().lines());
        assert!(!view.sync());
    }

    #[test]
    fn test_increment_at_stock_shows_line_notice() {
        let (store, events) = setup(vec![product(1, 500, 2)], vec![line(1, 500, 2)]);
        let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());

        let err = view.increment(ProductId::new(1)).unwrap_err();
        assert!(matches!(err, AppError::Cart(CartError::StockLimitReached { .. })));
        assert_eq!(stored_cart(&store), vec![line(1, 500, 2)]);

        let row = &view.page().rows[0];
        assert_eq!(
            row.notice.as_deref(),
            Some("Cannot add more products. Available stock limit reached.")
        );
        assert!(view.notice().message().is_none());
    }

    #[test]
    fn test_decrement_and_remove() {
        let (store, events) = setup(
            vec![product(1, 500, 5), product(2, 250, 5)],
            vec![line(1, 500, 2), line(2, 250, 1)],
        );
        let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());

        view.decrement(ProductId::new(1)).unwrap();
        assert_eq!(view.cart().get(ProductId::new(1)).unwrap().qty, 1);
        assert_eq!(view.cart().len(), 2);

        view.decrement(ProductId::new(2)).unwrap();
        assert_eq!(view.cart().len(), 1);

        view.remove(ProductId::new(1)).unwrap();
        view.remove(ProductId::new(1)).unwrap();
        assert!(view.cart().is_empty());
        assert!(stored_cart(&store).is_empty());
        assert_eq!(view.total(), Decimal::ZERO);
    }

    #[test]
    fn test_checkout_empty_cart_is_rejected() {
        let (store, events) = setup(vec![product(1, 500, 5)], vec![]);
        let mut view = CartView::mount(store, &events, ViewSettings::default());
        let mut nav = Navigator::new(Route::Cart);
        view.set_address("221B Baker Street, London");

        let err = view.checkout(&mut nav).unwrap_err();
        assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));
        assert_eq!(nav.current(), Route::Cart);
        assert_eq!(view.address(), "221B Baker Street, London");
        assert_eq!(
            view.notice().message().as_deref(),
            Some("Add at least one product to cart to checkout")
        );
    }

    #[test]
    fn test_checkout_short_address_is_rejected() {
        let (store, events) = setup(vec![product(1, 500, 5)], vec![line(1, 500, 1)]);
        let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());
        let mut nav = Navigator::new(Route::Cart);
        view.set_address("123 Main St");

        let err = view.checkout(&mut nav).unwrap_err();
        assert_eq!(err.to_string(), "Address should be at least 20 characters");
        assert_eq!(nav.current(), Route::Cart);
        assert_eq!(stored_cart(&store).len(), 1);
    }

    #[test]
    fn test_checkout_notice_replaces_previous() {
        let (store, events) = setup(vec![product(1, 500, 5)], vec![line(1, 500, 1)]);
        let mut view = CartView::mount(store, &events, ViewSettings::default());
        let mut nav = Navigator::new(Route::Cart);

        assert!(view.checkout(&mut nav).is_err());
        assert_eq!(view.notice().message().as_deref(), Some("Enter a valid address"));

        view.set_address("short");
        assert!(view.checkout(&mut nav).is_err());
        assert_eq!(
            view.notice().message().as_deref(),
            Some("Address should be at least 20 characters")
        );
    }

    #[test]
    fn test_checkout_resets_every_key() {
        let (store, events) = setup(vec![product(1, 500, 5)], vec![line(1, 500, 2)]);
        store.set("wishlist", "[1, 2]".to_string()).unwrap();
        let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());
        let mut nav = Navigator::new(Route::Cart);
        let mut other = events.subscribe();

        view.set_address("1234567890123456789012345");
        view.checkout(&mut nav).unwrap();

        assert_eq!(nav.current(), Route::Confirmation);
        for key in [keys::CART, keys::CATALOG, "wishlist"] {
            assert_eq!(store.get(key).unwrap().as_deref(), Some("[]"));
        }
        assert!(view.cart().is_empty());
        assert_eq!(view.total(), Decimal::ZERO);
        assert!(view.address().is_empty());
        assert_eq!(other.drain(), vec![CartEvent::Cleared]);
    }

    #[test]
    fn test_render_cart_page() {
        let (store, events) = setup(
            vec![product(1, 500, 5), product(2, 250, 5)],
            vec![line(1, 500, 2), line(2, 250, 1)],
        );
        let view = CartView::mount(store, &events, ViewSettings::default());
        let text = view.render().unwrap();

        assert!(text.contains("Tee 1"));
        assert!(text.contains("Cost: INR 500"));
        assert!(text.contains("Qty: 2"));
        assert!(text.contains("Total Cart Value: 1250 INR"));
    }

    #[test]
    fn test_render_empty_cart() {
        let view = CartView::mount(
            Arc::new(MemoryStore::new()),
            &CartEvents::default(),
            ViewSettings::default(),
        );
        let text = view.render().unwrap();
        assert!(text.contains("Cart is empty!"));
        assert!(text.contains("Total Cart Value: 0 INR"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_notice_clears_after_window() {
        let (store, events) = setup(vec![], vec![]);
        let settings = ViewSettings {
            notice_window: Duration::from_millis(500),
            ..ViewSettings::default()
        };
        let mut view = CartView::mount(store, &events, settings);

        assert!(view.checkout(&mut Navigator::default()).is_err());
        assert!(view.notice().message().is_some());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(view.notice().message().is_none());
    }
}
