//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Per-IP limiter keyed on the socket peer address.
pub type PeerIpLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Per-IP limiter keyed on `X-Forwarded-For` / `X-Real-IP` / `Forwarded`.
pub type ProxiedIpLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Time for one request to be replenished at `per_second` requests per second.
///
/// Returns `None` for a zero rate.
fn refill_period(per_second: u64) -> Option<Duration> {
    if per_second == 0 {
        return None;
    }

    Some(Duration::from_nanos((1_000_000_000 / per_second).max(1)))
}

/// Creates a rate limiter keyed on the peer socket address.
///
/// Each client IP gets a bucket of `burst` requests refilled at
/// `per_second` requests per second. Requests exceeding the limit receive
/// `429 Too Many Requests`.
///
/// Returns `None` when either value is zero, which disables limiting.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/urls", post(create_url_handler))
///     .layer(rate_limit::layer(2, 100).unwrap());
/// ```
pub fn layer(per_second: u64, burst: u32) -> Option<PeerIpLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .period(refill_period(per_second)?)
        .burst_size(burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Creates a rate limiter that reads the client IP from proxy headers.
///
/// Use only behind a trusted reverse proxy, since clients can forge these
/// headers when talking to the service directly.
pub fn proxied_layer(per_second: u64, burst: u32) -> Option<ProxiedIpLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .period(refill_period(per_second)?)
        .burst_size(burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_disables_limiting() {
        assert!(layer(0, 100).is_none());
        assert!(proxied_layer(0, 100).is_none());
    }

    #[test]
    fn test_zero_burst_disables_limiting() {
        assert!(layer(5, 0).is_none());
    }

    #[test]
    fn test_refill_period_is_inverse_of_rate() {
        assert_eq!(refill_period(0), None);
        assert_eq!(refill_period(1), Some(Duration::from_secs(1)));
        assert_eq!(refill_period(10), Some(Duration::from_millis(100)));
        assert_eq!(refill_period(u64::MAX), Some(Duration::from_nanos(1)));
    }

    #[test]
    fn test_valid_settings_build_layer() {
        assert!(layer(5, 100).is_some());
        assert!(proxied_layer(5, 100).is_some());
    }
}
