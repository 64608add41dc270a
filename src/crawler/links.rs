//! Detail page link extraction
//!
//! Collects the links posted inside the commentary of an item's discussion
//! page. Those links are the item's secondary resources.

use crate::crawler::fetcher::Fetcher;
use crate::url::{has_scheme, qualify_url};
use crate::FetchError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tokio::sync::Semaphore;

/// One commentary block; the lazy match stops at the block's own closing tag
static COMMENT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<(?:div|span)\s+class\s*=\s*["']commtext[^"']*["'][^>]*>(.*?)</(?:div|span)>"#)
        .expect("comment block regex is valid") // Static pattern, safe to panic
});

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["']"#)
        .expect("href regex is valid") // Static pattern, safe to panic
});

/// Fetches a detail page and returns the links found in its commentary
///
/// A permit of `gate` is held only while the page is being fetched and read;
/// it is released before the body is scanned.
///
/// # Returns
///
/// * `Ok(HashSet<String>)` - Absolute link targets (possibly empty)
/// * `Err(FetchError)` - The detail page could not be fetched
pub async fn extract_links<F>(
    fetcher: &F,
    base_url: &str,
    detail_url: &str,
    gate: &Semaphore,
) -> Result<HashSet<String>, FetchError>
where
    F: Fetcher + ?Sized,
{
    let body = {
        // acquire only fails on a closed semaphore; the gate is never closed
        let _permit = gate.acquire().await.ok();
        fetcher.fetch_text(detail_url).await?
    };

    Ok(commentary_links(&body, base_url))
}

/// Extracts the link targets found inside commentary blocks
///
/// Targets are HTML-unescaped and qualified against `base_url`; fragment-only
/// and non-HTTP targets (`mailto:`, `javascript:`) are dropped. Returns an
/// empty set when the page has no commentary.
pub fn commentary_links(body: &str, base_url: &str) -> HashSet<String> {
    COMMENT_BLOCK
        .captures_iter(body)
        .filter_map(|block| block.get(1))
        .flat_map(|block| HREF.captures_iter(block.as_str()))
        .filter_map(|href| href.get(1))
        .filter_map(|target| resolve_target(target.as_str(), base_url))
        .collect()
}

fn resolve_target(raw: &str, base_url: &str) -> Option<String> {
    let target = html_escape::decode_html_entities(raw);
    let target = target.trim();

    if target.is_empty() || target.starts_with('#') {
        return None;
    }

    if has_scheme(target) {
        let lower = target.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return None;
        }
    }

    Some(qualify_url(target, base_url))
}
