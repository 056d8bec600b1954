//! Infrastructure layer for external integrations.
//!
//! Implements the storage contract defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Redis, PostgreSQL and in-memory [`crate::domain::repositories::UrlStore`] backends

pub mod store;
