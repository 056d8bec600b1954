//! Core domain entities.
//!
//! - [`ShortUrl`] - A stored short code with its destination, click counter and expiry
//! - [`ExpiryWindow`] - A validated "expires in N days" value

pub mod short_url;

pub use short_url::{
    DEFAULT_EXPIRES_IN_DAYS, ExpiryWindow, MAX_EXPIRES_IN_DAYS, MAX_URL_LENGTH, ShortUrl,
};
