//! Per-marketplace extraction rules.
//!
//! Every marketplace runs through the same page loop in [`crate::engine`];
//! a [`Marketplace`] only supplies URLs, selector chains and card
//! extraction.

mod alibaba;
mod aliexpress;
mod common;
mod madeinchina;
mod temu;

pub use alibaba::Alibaba;
pub use aliexpress::AliExpress;
pub use madeinchina::MadeInChina;
pub use temu::Temu;

use pricescan_core::Platform;
use reqwest::Url;

use crate::assemble::CardFields;
use crate::document::Node;
use crate::error::CardError;
use crate::selector::SelectorChain;

/// Hand-tuned extraction rules for one marketplace.
#[allow(async_fn_in_trait)]
pub trait Marketplace {
    const PLATFORM: Platform;

    /// Scheme and host that relative card links are resolved against.
    const ORIGIN: &'static str;

    /// Upper bound on lazy-load scroll rounds per page.
    const MAX_SCROLL_ROUNDS: u32 = 16;

    /// Results page `page` (1-based) for `query`.
    fn search_url(&self, query: &str, page: u32) -> String;

    /// Secondary rendering of the same results page, used when the primary
    /// one serves a block page. Navigated with the mobile user agent.
    fn alternate_url(&self, _query: &str, _page: u32) -> Option<String> {
        None
    }

    /// Card container chains for the live document. `host` is the host
    /// currently displayed, which may be the alternate one.
    fn container_chains(&self, host: &str) -> &'static [SelectorChain];

    /// Container chains for the static fallback pass.
    fn static_container_chains(&self, host: &str) -> &'static [SelectorChain] {
        self.container_chains(host)
    }

    /// Resolves one card into field values.
    ///
    /// # Errors
    ///
    /// Returns a [`CardError`] when the card must be dropped.
    async fn extract_card<N: Node>(&self, card: &N) -> Result<CardFields, CardError>;
}

/// Builds a search URL from a fixed base; parameters are form-encoded, so
/// spaces become `+`.
pub(crate) fn search_url_with(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.into(),
        Err(err) => {
            tracing::error!(base, error = %err, "invalid search base url");
            base.to_string()
        }
    }
}

/// Host part of `url`, lowercased; empty when `url` does not parse.
#[must_use]
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_urls_are_form_encoded() {
        assert_eq!(
            AliExpress.search_url("cable usb c", 2),
            "https://es.aliexpress.com/wholesale?SearchText=cable+usb+c&page=2"
        );
        assert_eq!(
            Alibaba.search_url("led & lamp", 1),
            "https://www.alibaba.com/trade/search?SearchText=led+%26+lamp&page=1"
        );
        assert_eq!(
            Temu.search_url("audífonos", 3),
            "https://www.temu.com/pe/search.html?search_key=aud%C3%ADfonos&page=3"
        );
        assert_eq!(
            MadeInChina.search_url("polo shirt", 4),
            "https://es.made-in-china.com/productSearch?keyword=polo+shirt&currentPage=4&type=Product"
        );
    }

    #[test]
    fn only_aliexpress_has_an_alternate_host() {
        assert_eq!(
            AliExpress.alternate_url("cable usb", 1).as_deref(),
            Some("https://m.aliexpress.com/search.htm?keywords=cable+usb&page=1")
        );
        assert_eq!(Alibaba.alternate_url("x", 1), None);
        assert_eq!(Temu.alternate_url("x", 1), None);
        assert_eq!(MadeInChina.alternate_url("x", 1), None);
    }

    #[test]
    fn host_of_lowercases_and_tolerates_garbage() {
        assert_eq!(host_of("https://M.AliExpress.com/search.htm"), "m.aliexpress.com");
        assert_eq!(host_of("about:blank"), "");
        assert_eq!(host_of("not a url"), "");
    }
}
