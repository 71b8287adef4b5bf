use chrono::NaiveDate;
use pricescan_core::{Extensions, Platform, ProductRecord};

pub const UNTITLED: &str = "Untitled";

/// Field values resolved from one card, before platform/page tagging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardFields {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub price_original: Option<f64>,
    pub discount_text: Option<String>,
    pub sales_count: u64,
    /// Already absolute; see [`absolute_link`].
    pub link: String,
    pub currency_symbol: Option<String>,
    pub extensions: Extensions,
}

/// Where a card came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext {
    pub platform: Platform,
    pub page_index: u32,
    pub scrape_date: NaiveDate,
}

/// Builds the canonical record for a card.
#[must_use]
pub fn assemble(fields: CardFields, ctx: &RecordContext) -> ProductRecord {
    let title = fields
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    ProductRecord {
        title,
        price: fields.price,
        price_original: fields.price_original,
        discount_text: fields
            .discount_text
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        sales_count: fields.sales_count,
        link: fields.link,
        page_index: ctx.page_index,
        platform: ctx.platform,
        scrape_date: ctx.scrape_date,
        currency_symbol: fields.currency_symbol,
        extensions: fields.extensions,
    }
}

/// Resolves a card `href` against the marketplace `origin`.
///
/// Protocol-relative links get `https:`, root-relative and bare paths are
/// joined to the origin. Fragment-only and `javascript:` links resolve to an
/// empty string, which callers treat as "no link".
#[must_use]
pub fn absolute_link(origin: &str, href: &str) -> String {
    let href = href.trim();
    let origin = origin.trim_end_matches('/');

    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        String::new()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{origin}{href}")
    } else if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{origin}/{href}")
    }
}
