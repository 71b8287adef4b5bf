//! Selector chain resolution over either document representation.
//!
//! Absence is data here: every lookup returns `None` or an empty list rather
//! than an error when nothing matches or a query fails.

use std::time::Duration;

use tokio::time::Instant;

use crate::document::{Document, Node};
use crate::selector::SelectorChain;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The instant `timeout` from now, or `None` when that is past the end of
/// the clock. `None` means the wait is unbounded.
#[must_use]
pub fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// How long to sleep before the next poll, or `None` once `deadline` passed.
pub(crate) fn next_poll(deadline: Option<Instant>, interval: Duration) -> Option<Duration> {
    match deadline {
        Some(deadline) => {
            let now = Instant::now();
            (now < deadline).then(|| interval.min(deadline - now))
        }
        None => Some(interval),
    }
}

/// Returns the first element under `container` matched by any selector of
/// `chain`, trying selectors in order.
///
/// The element only has to exist; its text may still be empty.
pub async fn first_match<N: Node>(container: &N, chain: &SelectorChain) -> Option<N> {
    for css in chain.selectors {
        match container.select_first(css).await {
            Ok(Some(node)) => return Some(node),
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(field = chain.name, selector = css, error = %err, "selector query failed");
            }
        }
    }
    None
}

/// Finds card containers: the first selector, in declaration order across
/// `chains`, that yields at least one element wins.
///
/// Results from different selectors are never merged. When nothing matches
/// the document is polled again until `timeout` elapses; a zero timeout
/// makes exactly one pass.
pub async fn find_all_any<'d, D: Document>(
    doc: &'d D,
    chains: &[SelectorChain],
    timeout: Duration,
) -> Vec<D::Element<'d>> {
    let deadline = deadline_after(timeout);
    loop {
        for chain in chains {
            for css in chain.selectors {
                match doc.select_all(css).await {
                    Ok(nodes) if !nodes.is_empty() => {
                        tracing::debug!(field = chain.name, selector = css, count = nodes.len(), "containers located");
                        return nodes;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::debug!(field = chain.name, selector = css, error = %err, "container query failed");
                    }
                }
            }
        }

        let Some(pause) = next_poll(deadline, POLL_INTERVAL) else {
            return Vec::new();
        };
        tokio::time::sleep(pause).await;
    }
}

/// Reads a node's value: the data attribute when given and non-blank, then
/// rendered inner text, then raw text content.
pub async fn resolve_text<N: Node>(node: &N, data_attribute: Option<&str>) -> Option<String> {
    if let Some(attr) = data_attribute {
        if let Some(value) = non_blank(node.attribute(attr).await.ok().flatten()) {
            return Some(value);
        }
    }
    if let Some(text) = non_blank(node.inner_text().await.ok().flatten()) {
        return Some(text);
    }
    non_blank(node.text_content().await.ok().flatten())
}

/// [`first_match`] followed by [`resolve_text`] with the chain's data attribute.
pub async fn resolve_field<N: Node>(container: &N, chain: &SelectorChain) -> Option<String> {
    let node = first_match(container, chain).await?;
    resolve_text(&node, chain.data_attribute).await
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
