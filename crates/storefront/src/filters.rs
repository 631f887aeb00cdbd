//! Custom Askama template filters.

use std::fmt::Display;

/// Stylesheet URL when the build script could not fingerprint `main.css`.
const UNHASHED_CSS_HREF: &str = "/static/css/main.css";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the URL of the content-hashed main stylesheet.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_href }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_href(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_href(env!("CSS_HASH")))
}

fn stylesheet_href(hash: &str) -> String {
    if hash.is_empty() {
        UNHASHED_CSS_HREF.to_string()
    } else {
        format!("/static/css/derived/main.{hash}.css")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_href() {
        assert_eq!(stylesheet_href(""), "/static/css/main.css");
        assert_eq!(
            stylesheet_href("1a2b3c4d"),
            "/static/css/derived/main.1a2b3c4d.css"
        );
    }
}
