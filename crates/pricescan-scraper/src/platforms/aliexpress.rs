use std::sync::LazyLock;

use pricescan_core::Platform;
use regex::Regex;

use super::{common, search_url_with, Marketplace};
use crate::assemble::CardFields;
use crate::document::Node;
use crate::error::CardError;
use crate::normalize::{detect_currency, parse_price, parse_quantity};
use crate::resolve::{first_match, resolve_field};
use crate::selector::SelectorChain;

static SOLD_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d.,]+(?:\s*k)?)\+?\s*(?:vendidos?|sold)").expect("valid regex")
});

const DESKTOP_CONTAINERS: &[SelectorChain] = &[
    SelectorChain::new(
        "card",
        &[
            "div.search-item-card-wrapper-gallery",
            "div[data-widget-name='search-product']",
            "div.list-item",
            "a.search-card-item",
            "div.product-card",
        ],
    ),
];

const MOBILE_CONTAINERS: &[SelectorChain] = &[
    SelectorChain::new("card-mobile", &["div.list-item", "div.product-card", "a.product", "a.list-item"]),
];

/// Static snapshots keep the item links even when the gallery wrappers are
/// rendered by script only.
const STATIC_CONTAINERS: &[SelectorChain] = &[
    SelectorChain::new(
        "card",
        &[
            "div.search-item-card-wrapper-gallery",
            "div[data-widget-name='search-product']",
            "div.list-item",
            "div.product-card",
        ],
    ),
    SelectorChain::new("card-link", &["a.search-card-item", "a[href*='/item/']"]),
];

const ANCHOR: SelectorChain = SelectorChain::new("link", &["a.search-card-item", "a.product", "a"]);
const TITLE: SelectorChain = SelectorChain::new("title", &["h3", "[class*='titleText']", "h1"]);
const PRICE: SelectorChain = SelectorChain::new(
    "price",
    &["[data-price]", "[data-widget='price']", "div.price", "span.price", "span._18_85"],
)
.with_data_attribute("data-price");
const PRICE_ORIGINAL: SelectorChain = SelectorChain::new(
    "price-original",
    &["[data-original-price]", "del", ".original-price", "span._18_84"],
)
.with_data_attribute("data-original-price");
const DISCOUNT: SelectorChain =
    SelectorChain::new("discount", &["[data-discount]", ".discount", ".sale-tag", "span._18_86"])
        .with_data_attribute("data-discount");
const SOLD: SelectorChain =
    SelectorChain::new("sold", &["[data-sold]", ".sold", ".trade-num", ".sale-desc"])
        .with_data_attribute("data-sold");

/// `es.aliexpress.com`, with `m.aliexpress.com` as the alternate host.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliExpress;

impl Marketplace for AliExpress {
    const PLATFORM: Platform = Platform::AliExpress;
    const ORIGIN: &'static str = "https://es.aliexpress.com";
    const MAX_SCROLL_ROUNDS: u32 = 10;

    fn search_url(&self, query: &str, page: u32) -> String {
        search_url_with(
            "https://es.aliexpress.com/wholesale",
            &[("SearchText", query), ("page", &page.to_string())],
        )
    }

    fn alternate_url(&self, query: &str, page: u32) -> Option<String> {
        Some(search_url_with(
            "https://m.aliexpress.com/search.htm",
            &[("keywords", query), ("page", &page.to_string())],
        ))
    }

    fn container_chains(&self, host: &str) -> &'static [SelectorChain] {
        if is_mobile_host(host) {
            MOBILE_CONTAINERS
        } else {
            DESKTOP_CONTAINERS
        }
    }

    fn static_container_chains(&self, host: &str) -> &'static [SelectorChain] {
        if is_mobile_host(host) {
            MOBILE_CONTAINERS
        } else {
            STATIC_CONTAINERS
        }
    }

    async fn extract_card<N: Node>(&self, card: &N) -> Result<CardFields, CardError> {
        let anchor = first_match(card, &ANCHOR).await;
        let source = anchor.as_ref().unwrap_or(card);
        let link = common::link(source, Self::ORIGIN).await?;
        let title = common::title(card, &TITLE, source).await;

        let price_text = resolve_field(card, &PRICE).await;
        let price = price_text.as_deref().and_then(parse_price);
        let currency_symbol = price_text.as_deref().and_then(detect_currency);

        let price_original = resolve_field(card, &PRICE_ORIGINAL)
            .await
            .as_deref()
            .and_then(parse_price);
        let discount_text = resolve_field(card, &DISCOUNT).await;

        let sold_text = match resolve_field(card, &SOLD).await {
            Some(text) => Some(text),
            None => sold_from_text(&common::card_text(card).await),
        };
        let sales_count = sold_text.as_deref().map_or(0, parse_quantity);

        Ok(CardFields {
            title,
            price,
            price_original,
            discount_text,
            sales_count,
            link,
            currency_symbol,
            ..CardFields::default()
        })
    }
}

fn is_mobile_host(host: &str) -> bool {
    host.starts_with("m.") || host.starts_with("h5.")
}

/// Pulls `"1.234 vendidos"` / `"5k+ sold"` out of free card text.
fn sold_from_text(text: &str) -> Option<String> {
    SOLD_IN_TEXT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
