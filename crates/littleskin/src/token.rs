//! CSRF token scraping.
//!
//! Blessing Skin pages embed the per-session token in a meta tag. Scraping it
//! with a regex is brittle by nature, so the lookup is isolated here; if the
//! markup changes, only this module needs to follow.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CheckinError;

/// Header carrying the CSRF token on state-changing requests.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

static CSRF_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="csrf-token" content="(\w+)">"#).unwrap());

/// Extract the CSRF token embedded in a page's markup.
///
/// A missing tag usually means the markup changed or the session was
/// redirected to an error page; both warrant a fresh attempt.
pub fn extract_csrf(html: &str) -> Result<String, CheckinError> {
    CSRF_META
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or(CheckinError::TokenNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_meta_tag() {
        let html = r#"<meta name="csrf-token" content="abc123">"#;
        assert_eq!(extract_csrf(html).unwrap(), "abc123");
    }

    #[test]
    fn extracts_token_from_full_page() {
        let html = r#"
        <html>
        <head>
            <meta charset="utf-8">
            <meta name="csrf-token" content="e5fXq90Z">
        </head>
        <body>ok</body>
        </html>
        "#;
        assert_eq!(extract_csrf(html).unwrap(), "e5fXq90Z");
    }

    #[test]
    fn missing_tag_is_an_extraction_error() {
        let html = "<html><body>Maintenance</body></html>";
        assert!(matches!(
            extract_csrf(html),
            Err(CheckinError::TokenNotFound)
        ));
    }
}
