//! Recognition of block, CAPTCHA and robot-check interstitials.

use std::sync::LazyLock;

use pricescan_core::BlockSignatures;
use regex::Regex;
use scraper::{Html, Node};

static ROBOTS_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\b[^>]*\bname\s*=\s*["']?(?:robots|googlebot)["']?[^>]*>"#)
        .expect("valid regex")
});

/// Why a page was classified as a block page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    Url(String),
    Text(String),
    CaptchaMarker(String),
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::Url(sig) => write!(f, "url contains \"{sig}\""),
            BlockReason::Text(sig) => write!(f, "page text contains \"{sig}\""),
            BlockReason::CaptchaMarker(marker) => write!(f, "markup contains \"{marker}\""),
        }
    }
}

/// Pure inspection of a URL and page source against [`BlockSignatures`].
#[derive(Debug, Clone)]
pub struct BlockDetector {
    signatures: BlockSignatures,
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::new(BlockSignatures::default())
    }
}

impl BlockDetector {
    #[must_use]
    pub fn new(signatures: BlockSignatures) -> Self {
        Self {
            signatures: signatures.normalized(),
        }
    }

    /// Returns `true` when the URL, the visible text, or the raw markup
    /// carries a known block signature.
    #[must_use]
    pub fn is_blocked(&self, current_url: &str, page_source: &str) -> bool {
        self.detect(current_url, page_source).is_some()
    }

    /// Like [`Self::is_blocked`], reporting the first signature that matched.
    ///
    /// `robots` meta tags are removed before any markup scan, so a
    /// `noindex` directive on an ordinary results page is not a block.
    #[must_use]
    pub fn detect(&self, current_url: &str, page_source: &str) -> Option<BlockReason> {
        let url = current_url.to_lowercase();
        if let Some(sig) = first_contained(&url, &self.signatures.url_signatures) {
            return Some(BlockReason::Url(sig.to_string()));
        }

        let markup = ROBOTS_META.replace_all(page_source, "");

        let text = visible_text(&markup).to_lowercase();
        if let Some(sig) = first_contained(&text, &self.signatures.text_signatures) {
            return Some(BlockReason::Text(sig.to_string()));
        }

        let raw = markup.to_lowercase();
        first_contained(&raw, &self.signatures.captcha_markers)
            .map(|marker| BlockReason::CaptchaMarker(marker.to_string()))
    }
}

fn first_contained<'s>(haystack: &str, needles: &'s [String]) -> Option<&'s str> {
    needles
        .iter()
        .map(String::as_str)
        .find(|needle| haystack.contains(needle))
}

/// Page text with markup removed, excluding script and style bodies.
fn visible_text(markup: &str) -> String {
    let html = Html::parse_document(markup);
    let mut out = String::with_capacity(markup.len() / 4);

    for node in html.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().is_some_and(|el| {
                matches!(el.name(), "script" | "style" | "noscript" | "template")
            })
        });
        if hidden {
            continue;
        }
        for word in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_URL: &str = "https://www.alibaba.com/trade/search?SearchText=usb&page=1";

    fn detector() -> BlockDetector {
        BlockDetector::default()
    }

    #[test]
    fn robots_meta_alone_is_not_a_block() {
        let page = r#"<html><head><meta name="robots" content="noindex,nofollow">
            <title>USB cable - Alibaba</title></head>
            <body><div class="card">USB cable, fast charging</div></body></html>"#;
        assert!(!detector().is_blocked(RESULTS_URL, page));
    }

    #[test]
    fn robots_meta_is_stripped_even_for_matching_markers() {
        let sigs = BlockSignatures {
            url_signatures: vec!["punish".to_string()],
            text_signatures: vec!["robot check".to_string()],
            captcha_markers: vec!["noindex".to_string()],
        };
        let detector = BlockDetector::new(sigs);
        let page = r#"<head><META NAME='robots' CONTENT='noindex'></head><body>ok</body>"#;
        assert!(!detector.is_blocked(RESULTS_URL, page));
    }

    #[test]
    fn url_signature_blocks() {
        let url = "https://www.aliexpress.com/_____tmd_____/punish?x5secdata=abc";
        assert!(detector().is_blocked(url, "<html></html>"));
        assert_eq!(
            detector().detect(url, ""),
            Some(BlockReason::Url("punish".to_string()))
        );
    }

    #[test]
    fn visible_text_signature_blocks_case_insensitively() {
        let page = "<body><h1>Are You A Robot?</h1><p>Please slide to verify</p></body>";
        assert_eq!(
            detector().detect(RESULTS_URL, page),
            Some(BlockReason::Text("are you a robot".to_string()))
        );
    }

    #[test]
    fn signature_split_by_markup_still_matches() {
        let page = "<body><span>Robot</span>\n   <span>check</span></body>";
        assert!(detector().is_blocked(RESULTS_URL, page));
    }

    #[test]
    fn script_bodies_are_not_visible_text() {
        let page = r#"<body><script>var msg = "are you a robot";</script><div>Lamp</div></body>"#;
        assert!(!detector().is_blocked(RESULTS_URL, page));
    }

    #[test]
    fn captcha_widget_markup_blocks() {
        let page = r#"<body><div class="g-recaptcha" data-sitekey="k"></div></body>"#;
        assert_eq!(
            detector().detect(RESULTS_URL, page),
            Some(BlockReason::CaptchaMarker("g-recaptcha".to_string()))
        );
    }

    #[test]
    fn ordinary_listing_with_robot_products_is_clear() {
        let page = "<body><div>Robot vacuum cleaner 3000Pa</div></body>";
        assert!(!detector().is_blocked(RESULTS_URL, page));
    }
}
