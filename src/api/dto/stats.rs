//! DTOs for the stats endpoint.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::entities::ShortUrl;

/// Click statistics for a short URL.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
    /// ISO-8601 timestamp with an explicit `+00:00` offset, or `null`.
    pub expires_at: Option<String>,
}

impl From<ShortUrl> for StatsResponse {
    fn from(record: ShortUrl) -> Self {
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
            clicks: record.clicks,
            expires_at: record
                .expires_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_expires_at_is_iso8601() {
        let record = ShortUrl {
            short_code: "abc".into(),
            original_url: "https://example.com".into(),
            clicks: 3,
            expires_at: Some(Utc.with_ymd_and_hms(2026, 10, 26, 12, 30, 0).unwrap()),
        };

        let response = StatsResponse::from(record);
        assert_eq!(
            response.expires_at.as_deref(),
            Some("2026-10-26T12:30:00+00:00")
        );
    }

    #[test]
    fn test_missing_expiry_serializes_as_null() {
        let record = ShortUrl::new("abc".into(), "https://example.com".into(), None);
        let json = serde_json::to_value(StatsResponse::from(record)).unwrap();
        assert!(json["expires_at"].is_null());
        assert_eq!(json["clicks"], 0);
    }
}
