//! TeeRex Core - Shared types library.
//!
//! This crate provides the types shared by every TeeRex component:
//! - `storefront` - Store, cart engine, notices and views
//! - `cli` - Command-line front end for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no timers.
//! Records here are exactly what the persisted store holds, so their serde
//! shape is part of the external contract.
//!
//! # Modules
//!
//! - [`types`] - Product ids, catalog products, cart lines, prices and routes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
