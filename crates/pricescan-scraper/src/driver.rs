//! Contract for the browser/document provider.
//!
//! The engine never talks to a concrete browser. A [`BrowserLauncher`]
//! yields one exclusive [`BrowserDriver`] per invocation; the driver owns the
//! browser process and its private profile directory.

use std::time::Duration;

use crate::document::Node;
use crate::error::DriverError;

/// One exclusive browser session showing a single tab.
///
/// Implementations must release the browser and its profile on drop as well
/// as on [`BrowserDriver::close`]: an invocation that is cancelled mid-page
/// never reaches `close`.
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    type Element: Node;

    /// Navigates the tab to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Timeout`] when the navigation exceeds `timeout`
    /// and [`DriverError::Navigation`] for any other navigation failure.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Evaluates a JavaScript expression and returns its JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Script`] when evaluation throws.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    /// Current serialized DOM of the tab.
    async fn page_source(&self) -> Result<String, DriverError>;

    async fn find_all(&self, css: &str) -> Result<Vec<Self::Element>, DriverError>;

    /// Overrides the user agent for subsequent navigations.
    async fn set_user_agent(&self, user_agent: &str) -> Result<(), DriverError>;

    /// Closes the browser and removes the session's profile directory.
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// Produces fresh, unshared browser sessions.
#[allow(async_fn_in_trait)]
pub trait BrowserLauncher {
    type Driver: BrowserDriver;

    /// # Errors
    ///
    /// Returns [`DriverError::Launch`] when no browser can be started or reached.
    async fn launch(&self) -> Result<Self::Driver, DriverError>;
}
