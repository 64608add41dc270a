//! Listing page parser
//!
//! Turns the listing page markup into an ordered list of item candidates.
//! The parser never fails: rows that do not look like items are skipped.

use crate::url::qualify_url;
use scraper::{ElementRef, Html, Selector};

/// One item discovered on the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCandidate {
    /// Absolute URL of the item's main resource; also the item's identity
    pub primary_url: String,

    /// Title as shown on the listing
    pub title: String,

    /// Absolute URL of the item's discussion page
    pub detail_url: String,
}

impl ItemCandidate {
    /// Identity used for deduplication across cycles
    pub fn identity(&self) -> &str {
        &self.primary_url
    }
}

/// Parses listing markup into at most `max_items` candidates
///
/// Candidates come out in the order they appear on the page. Scheme-less
/// URLs are qualified by prefixing `base_url`. Rows past the cap are never
/// examined.
///
/// # Listing Rules
///
/// - each item is a `tr.athing` row carrying an `id` attribute
/// - the primary link is the first `a[href]` inside `.titleline`
///   (older markup: `a.storylink`)
/// - the title is that link's text, trimmed
/// - the detail page is `item?id=<id>`
///
/// # Example
///
/// ```
/// use newsreel::crawler::parse_listing;
///
/// let html = r#"<table><tr class="athing" id="1">
///     <td><span class="titleline"><a href="https://example.com/a">A</a></span></td>
/// </tr></table>"#;
/// let items = parse_listing(html, "https://news.ycombinator.com/", 5);
/// assert_eq!(items[0].detail_url, "https://news.ycombinator.com/item?id=1");
/// ```
pub fn parse_listing(html: &str, base_url: &str, max_items: usize) -> Vec<ItemCandidate> {
    let (Ok(row_selector), Ok(link_selector)) = (
        Selector::parse("tr.athing[id]"),
        Selector::parse(".titleline > a[href], a.storylink[href]"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&row_selector)
        .filter_map(|row| parse_row(row, &link_selector, base_url))
        .take(max_items)
        .collect()
}

fn parse_row(row: ElementRef<'_>, link_selector: &Selector, base_url: &str) -> Option<ItemCandidate> {
    let id = row.value().attr("id")?.trim();
    if id.is_empty() {
        return None;
    }

    let link = row.select(link_selector).next()?;
    let href = link.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let title = link.text().collect::<String>().trim().to_string();
    if title.is_empty() {
        return None;
    }

    Some(ItemCandidate {
        primary_url: qualify_url(href, base_url),
        title,
        detail_url: qualify_url(&format!("item?id={}", id), base_url),
    })
}
