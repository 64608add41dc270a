//! URL handling module for Newsreel
//!
//! This module provides URL qualification against a base URL and the
//! derivation of safe file and folder names from URLs and titles.

mod sanitize;

pub use sanitize::{derive_file_name, sanitize_title, MAX_FILE_NAME, MAX_FOLDER_NAME};

/// Returns true if the URL starts with a scheme (`http:`, `https:`, `mailto:`, ...)
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`,
/// terminated by `:`.
pub fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Qualifies a URL against a base URL
///
/// URLs that lack a scheme are prefixed with `base_url`; URLs with a scheme
/// are returned unchanged. Protocol-relative URLs (`//host/path`) take the
/// base URL's scheme. A leading `/` on the relative URL is dropped when the
/// base already ends with one, so the join never doubles the separator.
///
/// # Examples
///
/// ```
/// use newsreel::url::qualify_url;
///
/// let base = "https://news.ycombinator.com/";
/// assert_eq!(qualify_url("item?id=1", base), "https://news.ycombinator.com/item?id=1");
/// assert_eq!(qualify_url("https://example.com/a", base), "https://example.com/a");
/// ```
pub fn qualify_url(url: &str, base_url: &str) -> String {
    let url = url.trim();
    if has_scheme(url) {
        return url.to_string();
    }

    if let Some(authority) = url.strip_prefix("//") {
        let scheme = base_url.split_once("://").map_or("https", |(scheme, _)| scheme);
        return format!("{}://{}", scheme, authority);
    }

    if base_url.ends_with('/') {
        format!("{}{}", base_url, url.trim_start_matches('/'))
    } else {
        format!("{}{}", base_url, url)
    }
}
