//! Storage contract for short URL records.
//!
//! The service depends only on [`UrlStore`], a narrow key-value contract
//! (conditional put, get, atomic increment, expiry). Implementations live in
//! `crate::infrastructure::store`.
//!
//! A `mockall` mock is generated for unit tests.

pub mod url_store;

pub use url_store::{StoreError, UrlStore};

#[cfg(test)]
pub use url_store::MockUrlStore;
