use pricescan_core::{Extensions, Platform};
use serde_json::{Map, Value};

use super::{common, search_url_with, Marketplace};
use crate::assemble::CardFields;
use crate::document::Node;
use crate::error::CardError;
use crate::normalize::{parse_price_range, parse_unit_count};
use crate::resolve::{first_match, resolve_field, resolve_text};
use crate::selector::SelectorChain;

const UNKNOWN: &str = "unknown";

const CONTAINERS: &[SelectorChain] = &[
    SelectorChain::new("card", &["div.product-info"]),
    SelectorChain::new("card-legacy", &["div.list-node-content", "div.product-list div.product-item"]),
];

const ANCHOR: SelectorChain =
    SelectorChain::new("link", &[".product-name a[href]", "a.product-title[href]", "a[href]"]);
const TITLE: SelectorChain =
    SelectorChain::new("title", &[".product-name h3", ".product-name a h3", ".product-name", "h2.product-name"]);
const PRICE: SelectorChain =
    SelectorChain::new("price", &[".product-price .price", "strong.price", ".search-price", ".product-price"]);
const MOQ: SelectorChain = SelectorChain::new("moq", &[".product-unit", "div.info", ".moq", "span.moq"]);
// "prodcut" is the class name the site actually ships.
const ATTRIBUTE_ROWS: SelectorChain = SelectorChain::new(
    "attribute-row",
    &[".prodcut-table .product-table-item", ".product-table .product-table-item"],
);
const COMPANY: SelectorChain = SelectorChain::new("company", &["a.company-name", ".supplier-name a", ".company a"]);
const LOCATION: SelectorChain =
    SelectorChain::new("location", &["div.company-address-detail", ".supplier-location", ".location"]);
const MEMBER_BADGE: SelectorChain =
    SelectorChain::new("member-badge", &[".diamond-member", ".gold-member", ".member-tag"]);
const SOLD: SelectorChain = SelectorChain::new("sold", &[".sold", ".trade-num", ".sale-desc"]);

/// `es.made-in-china.com` product search. Prices are listed as ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct MadeInChina;

impl Marketplace for MadeInChina {
    const PLATFORM: Platform = Platform::MadeInChina;
    const ORIGIN: &'static str = "https://es.made-in-china.com";

    fn search_url(&self, query: &str, page: u32) -> String {
        search_url_with(
            "https://es.made-in-china.com/productSearch",
            &[("keyword", query), ("currentPage", &page.to_string()), ("type", "Product")],
        )
    }

    fn container_chains(&self, _host: &str) -> &'static [SelectorChain] {
        CONTAINERS
    }

    async fn extract_card<N: Node>(&self, card: &N) -> Result<CardFields, CardError> {
        let anchor = first_match(card, &ANCHOR).await;
        let source = anchor.as_ref().unwrap_or(card);
        let link = common::link(source, Self::ORIGIN).await?;
        let title = common::title(card, &TITLE, source).await;

        let range = resolve_field(card, &PRICE)
            .await
            .map(|text| parse_price_range(&text))
            .unwrap_or_default();
        let price_original = match (range.min, range.max) {
            (Some(min), Some(max)) if max > min => Some(max),
            _ => None,
        };

        let moq_text = resolve_field(card, &MOQ).await;
        let moq_units = moq_text.as_deref().map_or(0, parse_unit_count);
        let sales_count = resolve_field(card, &SOLD)
            .await
            .as_deref()
            .map_or(0, parse_unit_count);

        let company = resolve_field(card, &COMPANY).await.unwrap_or_else(|| UNKNOWN.to_string());
        let location = resolve_field(card, &LOCATION).await.unwrap_or_else(|| UNKNOWN.to_string());
        let diamond_member = common::exists(card, &MEMBER_BADGE).await;

        let mut extensions = Extensions::new();
        extensions.insert("price_min", range.min);
        extensions.insert("price_max", range.max);
        extensions.insert("moq_text", moq_text);
        extensions.insert("moq_units", moq_units);
        extensions.insert("company", company);
        extensions.insert("location", location);
        extensions.insert("diamond_member", diamond_member);
        extensions.insert("attributes", attribute_table(card).await);

        Ok(CardFields {
            title,
            price: range.min,
            price_original,
            discount_text: None,
            sales_count,
            link,
            currency_symbol: range.currency,
            extensions,
        })
    }
}

/// Collects `Size: XL` style rows into an object. Keys lose a trailing `:`;
/// rows missing either side are skipped.
async fn attribute_table<N: Node>(card: &N) -> Value {
    let mut attributes = Map::new();

    let mut rows = Vec::new();
    for css in ATTRIBUTE_ROWS.selectors {
        if let Ok(found) = card.select_all(css).await {
            if !found.is_empty() {
                rows = found;
                break;
            }
        }
    }

    for row in &rows {
        let key = match row.select_first(".product-table-description").await {
            Ok(Some(node)) => resolve_text(&node, None).await,
            _ => None,
        };
        let value = match row
            .select_first(".prodcut-table-content, .product-table-content")
            .await
        {
            Ok(Some(node)) => resolve_text(&node, None).await,
            _ => None,
        };
        if let (Some(key), Some(value)) = (key, value) {
            let key = key.trim_end_matches(':').trim().to_string();
            if !key.is_empty() {
                attributes.insert(key, Value::String(value));
            }
        }
    }

    Value::Object(attributes)
}
