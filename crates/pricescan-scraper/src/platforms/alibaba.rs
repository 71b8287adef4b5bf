use pricescan_core::{Extensions, Platform};

use super::{common, search_url_with, Marketplace};
use crate::assemble::CardFields;
use crate::document::Node;
use crate::error::CardError;
use crate::normalize::{detect_currency, parse_moq, parse_percent, parse_price, parse_rating, parse_years};
use crate::resolve::{first_match, resolve_field, resolve_text};
use crate::selector::SelectorChain;

const CONTAINERS: &[SelectorChain] = &[
    SelectorChain::new("card", &["div.fy26-product-card-content", "div.searchx-product-card"]),
    SelectorChain::new("card-legacy", &["div.card-info.gallery-card-layout-info"]),
];

const ANCHOR: SelectorChain = SelectorChain::new(
    "link",
    &["h2.searchx-product-e-title a", "a.searchx-product-link-wrapper", "a"],
);
const TITLE: SelectorChain = SelectorChain::new(
    "title",
    &[
        "h2.searchx-product-e-title span",
        "h2.searchx-product-e-title a",
        "h2.search-card-e-title a",
        "h2.search-card-e-title",
        "h1, h2, h3",
    ],
);
const PRICE: SelectorChain = SelectorChain::new(
    "price",
    &[
        "div.searchx-product-price-price-main",
        "div.searchx-product-price",
        "div.search-card-e-price-main",
    ],
)
.with_data_attribute("data-price");
const PRICE_ORIGINAL: SelectorChain =
    SelectorChain::new("price-original", &["del", "s", ".price-origin"]).with_data_attribute("data-original-price");
const DISCOUNT: SelectorChain = SelectorChain::new("discount", &[".discount", ".sale-tag", "[data-discount]"]);
const MOQ: SelectorChain = SelectorChain::new("moq", &["div.searchx-moq", "div.price-area-center"]);
const SUPPLIER: SelectorChain =
    SelectorChain::new("supplier", &["a.searchx-product-e-company", "a.search-card-e-company"]);
const SUPPLIER_YEAR_COUNTRY: SelectorChain =
    SelectorChain::new("supplier-year", &["a.searchx-product-e-supplier__year"]);
const VERIFIED: SelectorChain = SelectorChain::new(
    "verified",
    &[".verified-supplier-icon__wrapper", "img.searchx-verified-icon"],
);
const RATING: SelectorChain = SelectorChain::new("rating", &["span.searchx-product-e-review"]);
const SELLING_POINT: SelectorChain = SelectorChain::new("selling-point", &[".searchx-selling-point-text"]);

/// `www.alibaba.com` wholesale search. Cards carry supplier metadata, and
/// the minimum order quantity stands in for a sales count.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alibaba;

impl Marketplace for Alibaba {
    const PLATFORM: Platform = Platform::Alibaba;
    const ORIGIN: &'static str = "https://www.alibaba.com";

    fn search_url(&self, query: &str, page: u32) -> String {
        search_url_with(
            "https://www.alibaba.com/trade/search",
            &[("SearchText", query), ("page", &page.to_string())],
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

        let price_text = resolve_field(card, &PRICE).await;
        let price = price_text.as_deref().and_then(parse_price);
        let currency = price_text.as_deref().and_then(detect_currency);

        let price_original = resolve_field(card, &PRICE_ORIGINAL)
            .await
            .as_deref()
            .and_then(parse_price);
        let discount_text = resolve_field(card, &DISCOUNT).await;

        let (moq, moq_text) = match resolve_field(card, &MOQ).await {
            Some(text) => parse_moq(&text),
            None => (None, None),
        };

        let supplier = resolve_field(card, &SUPPLIER).await;
        let (supplier_years, supplier_country) = match first_match(card, &SUPPLIER_YEAR_COUNTRY).await {
            Some(node) => years_and_country(&node).await,
            None => (None, None),
        };
        let supplier_verified = common::exists(card, &VERIFIED).await;

        let (rating_score, rating_count) = resolve_field(card, &RATING)
            .await
            .as_deref()
            .and_then(parse_rating)
            .map_or((None, None), |(score, count)| (Some(score), Some(count)));

        let (shipping_promise, repeat_rate) = match resolve_field(card, &SELLING_POINT).await {
            Some(text) => {
                let lower = text.to_lowercase();
                let shipping = (lower.contains("envío") || lower.contains("shipping")).then(|| text.clone());
                (shipping, parse_percent(&text))
            }
            None => (None, None),
        };

        let mut extensions = Extensions::new();
        extensions.insert("currency", currency.clone());
        extensions.insert("supplier", supplier);
        extensions.insert("supplier_years", supplier_years);
        extensions.insert("supplier_country", supplier_country);
        extensions.insert("supplier_verified", supplier_verified);
        extensions.insert("rating_score", rating_score);
        extensions.insert("rating_count", rating_count);
        extensions.insert("moq", moq);
        extensions.insert("moq_text", moq_text);
        extensions.insert("shipping_promise", shipping_promise);
        extensions.insert("repeat_rate", repeat_rate);

        Ok(CardFields {
            title,
            price,
            price_original,
            discount_text,
            sales_count: moq.unwrap_or(0),
            link,
            currency_symbol: currency,
            extensions,
        })
    }
}

/// Reads `<a><span>4 yrs</span><img alt="CN"><span>CN</span></a>`.
///
/// The country comes from the flag's `alt`, or else a short last span.
async fn years_and_country<N: Node>(node: &N) -> (Option<u32>, Option<String>) {
    let years = resolve_text(node, None).await.as_deref().and_then(parse_years);

    let flag_alt = match node.select_first("img[alt]").await {
        Ok(Some(img)) => img
            .attribute("alt")
            .await
            .ok()
            .flatten()
            .map(|alt| alt.trim().to_string())
            .filter(|alt| !alt.is_empty()),
        _ => None,
    };
    if flag_alt.is_some() {
        return (years, flag_alt);
    }

    let last_span = match node.select_all("span").await {
        Ok(spans) => match spans.last() {
            Some(span) => resolve_text(span, None).await,
            None => None,
        },
        Err(_) => None,
    };
    (years, last_span.filter(|s| s.chars().count() <= 3))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::document::{Document, StaticDocument};

    const CARD: &str = r#"
      <div class="searchx-product-card">
        <h2 class="searchx-product-e-title">
          <a href="//www.alibaba.com/product-detail/Led-Lamp_1600.html"><span>LED Desk Lamp</span></a>
        </h2>
        <div class="searchx-product-price">US$1,299.50-1,599.75</div>
        <div class="searchx-moq">Pedido mín: 2 unidades</div>
        <a class="searchx-product-e-company">Shenzhen Bright Co., Ltd.</a>
        <a class="searchx-product-e-supplier__year"><span>4 años</span><img alt="CN" src="cn.png"><span>CN</span></a>
        <img class="searchx-verified-icon" src="v.png">
        <span class="searchx-product-e-review">4.8/5.0 (120)</span>
        <div class="searchx-selling-point-text">Envío en 15 días · 31% repiten</div>
      </div>"#;

    async fn extract(html: &str) -> CardFields {
        let doc = StaticDocument::parse(html);
        let card = doc.select_all("div.searchx-product-card").await.unwrap().remove(0);
        Alibaba.extract_card(&card).await.unwrap()
    }

    #[tokio::test]
    async fn full_card() {
        let fields = extract(CARD).await;

        assert_eq!(fields.title.as_deref(), Some("LED Desk Lamp"));
        assert_eq!(fields.link, "https://www.alibaba.com/product-detail/Led-Lamp_1600.html");
        assert_eq!(fields.price, Some(1299.5));
        assert_eq!(fields.currency_symbol.as_deref(), Some("US$"));
        assert_eq!(fields.sales_count, 2);

        let ext = &fields.extensions;
        assert_eq!(ext.get("supplier"), Some(&json!("Shenzhen Bright Co., Ltd.")));
        assert_eq!(ext.get("supplier_years"), Some(&json!(4)));
        assert_eq!(ext.get("supplier_country"), Some(&json!("CN")));
        assert_eq!(ext.get("supplier_verified"), Some(&json!(true)));
        assert_eq!(ext.get("rating_score"), Some(&json!(4.8)));
        assert_eq!(ext.get("rating_count"), Some(&json!(120)));
        assert_eq!(ext.get("moq"), Some(&json!(2)));
        assert_eq!(ext.get("moq_text"), Some(&json!("Pedido mín: 2 unidades")));
        assert_eq!(ext.get("shipping_promise"), Some(&json!("Envío en 15 días · 31% repiten")));
        assert_eq!(ext.get("repeat_rate"), Some(&json!(31)));
    }

    #[tokio::test]
    async fn extension_keys_keep_their_order() {
        let fields = extract(CARD).await;
        let keys: Vec<&str> = fields.extensions.keys().collect();
        assert_eq!(
            keys,
            [
                "currency",
                "supplier",
                "supplier_years",
                "supplier_country",
                "supplier_verified",
                "rating_score",
                "rating_count",
                "moq",
                "moq_text",
                "shipping_promise",
                "repeat_rate",
            ]
        );
    }

    #[tokio::test]
    async fn sparse_card_yields_nulls() {
        let fields = extract(
            r#"<div class="searchx-product-card">
                 <a class="searchx-product-link-wrapper" href="/product-detail/x.html" title="Mug"></a>
                 <a class="searchx-product-e-supplier__year"><span>2 yrs</span><span>Guangdong</span></a>
               </div>"#,
        )
        .await;

        assert_eq!(fields.title.as_deref(), Some("Mug"));
        assert_eq!(fields.link, "https://www.alibaba.com/product-detail/x.html");
        assert_eq!(fields.price, None);
        assert_eq!(fields.sales_count, 0);
        assert_eq!(fields.extensions.get("supplier_years"), Some(&json!(2)));
        assert_eq!(fields.extensions.get("supplier_country"), Some(&Value::Null));
        assert_eq!(fields.extensions.get("supplier_verified"), Some(&json!(false)));
        assert_eq!(fields.extensions.get("repeat_rate"), Some(&Value::Null));
    }
}
