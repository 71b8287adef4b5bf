//! The two interchangeable page representations extraction runs against.
//!
//! A [`LiveDocument`] queries the rendered page through the browser driver;
//! a [`StaticDocument`] queries a parsed snapshot of the page source. Both
//! hand out [`Node`]s, so selector chains and card extractors are written
//! once and run over either.

use scraper::{ElementRef, Html, Selector};

use crate::driver::BrowserDriver;
use crate::error::DriverError;

/// An element that can be queried for descendants, attributes and text.
#[allow(async_fn_in_trait)]
pub trait Node: Sized {
    /// Descendants matching `css`, in document order.
    async fn select_all(&self, css: &str) -> Result<Vec<Self>, DriverError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;

    /// Rendered text, whitespace-collapsed the way a user would read it.
    async fn inner_text(&self) -> Result<Option<String>, DriverError>;

    /// Raw concatenated text of all descendant text nodes.
    async fn text_content(&self) -> Result<Option<String>, DriverError>;

    async fn select_first(&self, css: &str) -> Result<Option<Self>, DriverError> {
        Ok(self.select_all(css).await?.into_iter().next())
    }
}

/// A page-level query surface.
#[allow(async_fn_in_trait)]
pub trait Document {
    type Element<'a>: Node
    where
        Self: 'a;

    async fn select_all<'a>(&'a self, css: &str) -> Result<Vec<Self::Element<'a>>, DriverError>;
}

// ---------------------------------------------------------------------------
// Live
// ---------------------------------------------------------------------------

/// The rendered page, queried through the driver.
pub struct LiveDocument<'d, D> {
    driver: &'d D,
}

impl<'d, D: BrowserDriver> LiveDocument<'d, D> {
    pub(crate) fn new(driver: &'d D) -> Self {
        Self { driver }
    }
}

impl<D: BrowserDriver> Document for LiveDocument<'_, D> {
    type Element<'a>
        = D::Element
    where
        Self: 'a;

    async fn select_all<'a>(&'a self, css: &str) -> Result<Vec<D::Element>, DriverError> {
        self.driver.find_all(css).await
    }
}

// ---------------------------------------------------------------------------
// Static
// ---------------------------------------------------------------------------

/// A parsed snapshot of page source, queried without script execution.
pub struct StaticDocument {
    html: Html,
}

impl StaticDocument {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl Document for StaticDocument {
    type Element<'a> = StaticNode<'a>;

    async fn select_all<'a>(&'a self, css: &str) -> Result<Vec<StaticNode<'a>>, DriverError> {
        let selector = parse_selector(css)?;
        Ok(self.html.select(&selector).map(StaticNode).collect())
    }
}

/// An element of a [`StaticDocument`].
#[derive(Debug, Clone, Copy)]
pub struct StaticNode<'a>(ElementRef<'a>);

impl Node for StaticNode<'_> {
    async fn select_all(&self, css: &str) -> Result<Vec<Self>, DriverError> {
        let selector = parse_selector(css)?;
        let own_id = self.0.id();
        Ok(self
            .0
            .select(&selector)
            .filter(|el| el.id() != own_id)
            .map(StaticNode)
            .collect())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.0.value().attr(name).map(str::to_string))
    }

    async fn inner_text(&self) -> Result<Option<String>, DriverError> {
        Ok(non_empty(collapse_text(self.0)))
    }

    async fn text_content(&self) -> Result<Option<String>, DriverError> {
        Ok(non_empty(self.0.text().collect::<String>().trim().to_string()))
    }
}

/// Joins descendant text nodes with single spaces, skipping blank runs.
#[must_use]
pub fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, DriverError> {
    Selector::parse(css).map_err(|e| DriverError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
