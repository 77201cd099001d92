//! Persisted key/value store.
//!
//! The store holds a handful of keys, each mapped to the serialized JSON text
//! of a sequence of records - the same layout browser local storage uses.
//! There is no atomicity across keys and no coordination between writers:
//! the last `set` wins.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-memory map, for tests and throwaway sessions
//! - [`FileStore`] - a single JSON document on disk, rewritten on every `set`
//!
//! # Reading sequences
//!
//! [`read_sequence`] never fails on bad data: an absent key, a value that is
//! not a JSON array, or records that do not decode all read as an empty
//! sequence. Only backend failures surface as [`StoreError`].

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Well-known store keys.
pub mod keys {
    /// Catalog of available products, written by the listing page.
    pub const CATALOG: &str = "allProducts";
    /// Current cart lines.
    pub const CART: &str = "cartItems";
}

/// Serialized form of an empty sequence.
pub const EMPTY_SEQUENCE: &str = "[]";

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized, or the backing document is corrupt.
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous key/value store of serialized sequences.
pub trait PersistedStore: Send + Sync + std::fmt::Debug {
    /// Raw text stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Every key currently tracked by the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Shared handle to a store, passed to every view.
pub type SharedStore = Arc<dyn PersistedStore>;

/// Read the sequence stored under `key`.
///
/// Absent keys and malformed values read as an empty sequence.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
#[instrument(skip(store))]
pub fn read_sequence<T: DeserializeOwned>(
    store: &dyn PersistedStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        debug!(key, "Key absent, reading empty sequence");
        return Ok(Vec::new());
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Stored value is not valid JSON, reading empty sequence");
            return Ok(Vec::new());
        }
    };

    if !value.is_array() {
        warn!(key, "Stored value is not a sequence, reading empty sequence");
        return Ok(Vec::new());
    }

    match serde_json::from_value(value) {
        Ok(records) => Ok(records),
        Err(e) => {
            warn!(key, error = %e, "Stored records do not decode, reading empty sequence");
            Ok(Vec::new())
        }
    }
}

/// Serialize `records` and store them under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the backend write fails.
#[instrument(skip(store, records), fields(len = records.len()))]
pub fn write_sequence<T: Serialize>(
    store: &dyn PersistedStore,
    key: &str,
    records: &[T],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(records)?;
    store.set(key, raw)?;
    debug!(key, "Sequence written");
    Ok(())
}

/// Reset every tracked key to an empty sequence.
///
/// Returns the number of keys reset.
///
/// # Errors
///
/// Returns an error on the first backend failure; keys already reset stay reset.
pub fn reset_all(store: &dyn PersistedStore) -> Result<usize, StoreError> {
    let keys = store.keys()?;
    for key in &keys {
        store.set(key, EMPTY_SEQUENCE.to_string())?;
    }
    debug!(count = keys.len(), "All keys reset");
    Ok(keys.len())
}
