//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted, so validation never
//! rewrites the input; it only decides whether it is acceptable.

use url::Url;

use crate::domain::entities::MAX_URL_LENGTH;

/// Reasons a destination URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("url is required")]
    Empty,

    #[error("url must be at most {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("url must not contain whitespace or control characters")]
    ForbiddenCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("url must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute HTTP(S) URL usable as a `Location` header.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and other non-HTTP schemes, and
/// any character that could split or corrupt a response header.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
pub fn validate_destination(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(UrlValidationError::ForbiddenCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_with_path_and_query() {
        assert!(validate_destination("https://example.com/long/path?x=1#frag").is_ok());
    }

    #[test]
    fn test_accepts_http_with_port() {
        assert!(validate_destination("http://localhost:8080/").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_destination(""), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_destination("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_javascript_scheme() {
        assert_eq!(
            validate_destination("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_ftp_scheme() {
        assert_eq!(
            validate_destination("ftp://example.com/file"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_header_splitting() {
        assert_eq!(
            validate_destination("https://example.com/\r\nSet-Cookie: a=b"),
            Err(UrlValidationError::ForbiddenCharacters)
        );
    }

    #[test]
    fn test_rejects_spaces() {
        assert_eq!(
            validate_destination("https://example.com/a b"),
            Err(UrlValidationError::ForbiddenCharacters)
        );
    }

    #[test]
    fn test_rejects_too_long() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(validate_destination(&long), Err(UrlValidationError::TooLong));
    }

    #[test]
    fn test_does_not_rewrite_input() {
        let input = "HTTPS://Example.COM:443/Path";
        assert!(validate_destination(input).is_ok());
        assert_eq!(input, "HTTPS://Example.COM:443/Path");
    }
}
