use pricescan_core::Platform;

use super::{common, search_url_with, Marketplace};
use crate::assemble::CardFields;
use crate::document::Node;
use crate::error::CardError;
use crate::normalize::{detect_currency, join_split_price, parse_price, parse_quantity};
use crate::resolve::{first_match, resolve_field, resolve_text};
use crate::selector::SelectorChain;

const CONTAINERS: &[SelectorChain] = &[
    SelectorChain::new(
        "card",
        &[
            "div._6q6qVUF5._1UrrHYym",
            "div._6q6qVUF5._1QhQr8pq._2gAD5fPC._3AbcHYoU",
            "div._3tAUu0RX",
        ],
    ),
    SelectorChain::new("card-generic", &["div.product-card", "div.card"]),
];

const ANCHOR: SelectorChain =
    SelectorChain::new("link", &["a._2Tl9qLr1", "a[href^='/pe/']", "a[href^='/']", "a"]);
const TITLE: SelectorChain = SelectorChain::new(
    "title",
    &["h2._2BvQbnbN span._2D9RBAXL", "h2._2BvQbnbN", "h3._2BvQbnbN", "h2, h3", "span._2D9RBAXL"],
);
const PRICE_INTEGER: SelectorChain = SelectorChain::new("price-integer", &["span._2de9ERAH"]);
const PRICE_DECIMAL: SelectorChain = SelectorChain::new("price-decimal", &["span._3SrxhhHh"]);
const PRICE_ANY: SelectorChain = SelectorChain::new(
    "price",
    &[
        "div._2myxWHLi [data-type='price']",
        "div[class*='price']",
        "span[class*='price']",
        "div.price",
        "span.price",
    ],
);
const PRICE_ORIGINAL: SelectorChain =
    SelectorChain::new("price-original", &["span._3TAPHDOX", "del", "s", "span[class*='original']"]);
const DISCOUNT: SelectorChain = SelectorChain::new(
    "discount",
    &["div.gXSsgZXB", "div._1LLbpUTn", "div[class*='discount']", "span[class*='discount']"],
);
const SOLD: SelectorChain = SelectorChain::new(
    "sold",
    &["span._3vfo0XTx", "div[data-type='saleTips']", "span[class*='sold']", "div[class*='sold']"],
);
const AD_BADGE: SelectorChain = SelectorChain::new("ad-badge", &["div._2QlTgZaA"]);

/// `www.temu.com/pe`. Sponsored cards are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Temu;

impl Marketplace for Temu {
    const PLATFORM: Platform = Platform::Temu;
    const ORIGIN: &'static str = "https://www.temu.com";
    const MAX_SCROLL_ROUNDS: u32 = 18;

    fn search_url(&self, query: &str, page: u32) -> String {
        search_url_with(
            "https://www.temu.com/pe/search.html",
            &[("search_key", query), ("page", &page.to_string())],
        )
    }

    fn container_chains(&self, _host: &str) -> &'static [SelectorChain] {
        CONTAINERS
    }

    async fn extract_card<N: Node>(&self, card: &N) -> Result<CardFields, CardError> {
        if is_advertisement(card).await {
            return Err(CardError::Advertisement);
        }

        let anchor = first_match(card, &ANCHOR).await;
        let source = anchor.as_ref().unwrap_or(card);
        let link = common::link(source, Self::ORIGIN).await?;
        let title = common::title(card, &TITLE, source).await;

        let (price, currency_symbol) = price_and_currency(card).await;

        let price_original = resolve_field(card, &PRICE_ORIGINAL)
            .await
            .as_deref()
            .and_then(parse_price);
        let discount_text = resolve_field(card, &DISCOUNT).await;
        let sales_count = resolve_field(card, &SOLD)
            .await
            .as_deref()
            .map_or(0, parse_quantity);

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

async fn is_advertisement<N: Node>(card: &N) -> bool {
    resolve_field(card, &AD_BADGE).await.is_some_and(|badge| {
        let badge = badge.to_lowercase();
        badge.contains("anuncio") || badge.split_whitespace().any(|w| w == "ad" || w == "sponsored")
    })
}

/// Joins the split integer/decimal spans; falls back to any price node.
async fn price_and_currency<N: Node>(card: &N) -> (Option<f64>, Option<String>) {
    let integer = match first_match(card, &PRICE_INTEGER).await {
        Some(node) => resolve_text(&node, None).await,
        None => None,
    };
    let decimal = match first_match(card, &PRICE_DECIMAL).await {
        Some(node) => resolve_text(&node, None).await,
        None => None,
    };

    if let Some(joined) = join_split_price(integer.as_deref(), decimal.as_deref()) {
        let currency = integer.as_deref().and_then(detect_currency);
        return (parse_price(&joined), currency);
    }

    let text = resolve_field(card, &PRICE_ANY).await;
    (
        text.as_deref().and_then(parse_price),
        text.as_deref().and_then(detect_currency),
    )
}
