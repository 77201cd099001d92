//! TeeRex Storefront library.
//!
//! Cart state management for the TeeRex store: a persisted key/value store,
//! the cart engine, transient notices and the views that tie them together.
//!
//! # Architecture
//!
//! - [`store`] - `PersistedStore` trait with in-memory and file backends
//! - [`catalog`] / [`cart`] / [`checkout`] - pure cart engine and validation
//! - [`events`] - "cart changed" broadcast between views
//! - [`notice`] - auto-clearing notices with timer supersession
//! - [`views`] - listing, cart and cart-line views, rendered with askama
//! - [`navigation`] - active page tracking
//!
//! Views receive the store as an explicit [`store::SharedStore`] handle;
//! nothing here reads ambient global state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod navigation;
pub mod notice;
pub mod store;
pub mod views;

pub use cart::{Cart, CartError, Decrement, compute_total};
pub use catalog::Catalog;
pub use checkout::{CheckoutError, validate_checkout};
pub use error::{AppError, Result};
pub use events::{CartEvent, CartEvents, LineChange};
pub use navigation::Navigator;
pub use notice::{NoticeBoard, NoticeState};
pub use views::{CartItemView, CartView, ListingView, ViewSettings};
