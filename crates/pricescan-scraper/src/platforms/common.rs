use crate::assemble::absolute_link;
use crate::document::Node;
use crate::error::CardError;
use crate::resolve::{first_match, resolve_field, resolve_text};
use crate::selector::SelectorChain;

/// Absolute product link read from `source`'s `href`.
pub(super) async fn link<N: Node>(source: &N, origin: &str) -> Result<String, CardError> {
    let href = source.attribute("href").await?.unwrap_or_default();
    let link = absolute_link(origin, &href);
    if link.is_empty() {
        return Err(CardError::MissingLink);
    }
    Ok(link)
}

/// Title node text, then the anchor's `title` attribute, then its text.
pub(super) async fn title<N: Node>(card: &N, chain: &SelectorChain, anchor: &N) -> Option<String> {
    if let Some(title) = resolve_field(card, chain).await {
        return Some(title);
    }
    if let Some(title) = anchor
        .attribute("title")
        .await
        .ok()
        .flatten()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        return Some(title);
    }
    resolve_text(anchor, None).await
}

pub(super) async fn exists<N: Node>(card: &N, chain: &SelectorChain) -> bool {
    first_match(card, chain).await.is_some()
}

/// Visible text of the whole card.
pub(super) async fn card_text<N: Node>(card: &N) -> String {
    resolve_text(card, None).await.unwrap_or_default()
}
