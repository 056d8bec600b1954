//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into [`UrlService`](crate::application::services::UrlService)
//! calls and formats responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Tracing, request id and rate limiting middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
