//! Core types for the TeeRex store.
//!
//! This module provides type-safe wrappers for the catalog and cart records.

pub mod id;
pub mod price;
pub mod product;
pub mod route;

pub use id::*;
pub use price::{Currency, Price};
pub use product::{CartLine, Product};
pub use route::Route;
