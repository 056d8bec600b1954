//! Domain layer: the short URL record and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures ([`entities::ShortUrl`], [`entities::ExpiryWindow`])
//! - [`repositories`] - The [`repositories::UrlStore`] trait every backend implements
//!
//! The domain layer has no dependency on HTTP or on any concrete store.
//! Durability, atomic counters and expiry all live behind [`repositories::UrlStore`].

pub mod entities;
pub mod repositories;
