//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlStore`] trait and
//! expose the operations HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Create, redirect and stats
pub mod services;
