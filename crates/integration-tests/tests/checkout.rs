//! Checkout validation, store reset and navigation.

use std::time::Duration;

use teerex_core::Route;
use teerex_integration_tests::{line, memory_store, product, stored_cart};
use teerex_storefront::store::{PersistedStore, keys};
use teerex_storefront::{AppError, CartEvents, CartView, CheckoutError, Navigator, ViewSettings};

#[test]
fn test_rules_apply_in_order() {
    let tee = product(1, "Tee", 500, 3);

    let store = memory_store(&[tee.clone()], &[]);
    let mut view = CartView::mount(store, &CartEvents::default(), ViewSettings::default());
    let mut nav = Navigator::new(Route::Cart);
    view.set_address("x");
    assert!(matches!(
        view.checkout(&mut nav),
        Err(AppError::Checkout(CheckoutError::EmptyCart))
    ));

    let store = memory_store(&[tee.clone()], &[line(&tee, 1)]);
    let mut view = CartView::mount(store.clone(), &CartEvents::default(), ViewSettings::default());
    assert!(matches!(
        view.checkout(&mut nav),
        Err(AppError::Checkout(CheckoutError::MissingAddress))
    ));

    view.set_address("123 Main St");
    assert!(matches!(
        view.checkout(&mut nav),
        Err(AppError::Checkout(CheckoutError::AddressTooShort { length: 11 }))
    ));
    assert_eq!(nav.current(), Route::Cart);
    assert_eq!(stored_cart(&store), vec![line(&tee, 1)]);
}

#[test]
fn test_successful_checkout_resets_store_and_navigates() {
    let tee = product(1, "Tee", 500, 3);
    let store = memory_store(&[tee.clone()], &[line(&tee, 2)]);
    store.set("recentlyViewed", "[1]".to_string()).unwrap();
    let events = CartEvents::default();
    let mut view = CartView::mount(store.clone(), &events, ViewSettings::default());
    let mut other = CartView::mount(store.clone(), &events, ViewSettings::default());
    let mut nav = Navigator::new(Route::Cart);

    view.set_address("Flat 4, 12 Park Street, Kolkata");
    view.checkout(&mut nav).unwrap();

    assert_eq!(nav.current(), Route::Confirmation);
    assert!(stored_cart(&store).is_empty());
    for key in [keys::CART, keys::CATALOG, "recentlyViewed"] {
        assert_eq!(store.get(key).unwrap().as_deref(), Some("[]"));
    }

    assert!(other.sync());
    assert!(other.cart().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rejection_notice_lifecycle() {
    let store = memory_store(&[], &[]);
    let mut view = CartView::mount(store, &CartEvents::default(), ViewSettings::default());
    let mut nav = Navigator::default();
    let mut notices = view.notice().subscribe();

    assert!(view.checkout(&mut nav).is_err());
    assert_eq!(
        notices.borrow_and_update().message(),
        Some("Add at least one product to cart to checkout")
    );

    tokio::time::sleep(Duration::from_millis(2000)).await;
    view.set_address("somewhere");
    assert!(view.checkout(&mut nav).is_err());

    // The first notice's window has passed; the repeat restarted it.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(view.notice().message().is_some());

    notices.wait_for(|state| state.message().is_none()).await.unwrap();
    assert!(view.notice().message().is_none());
    assert!(view.render().unwrap().contains("Cart is empty!"));
}
