//! Chromium sessions over the DevTools protocol.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, Element, Handler, Page};
use futures::StreamExt;
use pricescan_core::AppConfig;
use pricescan_scraper::{BrowserDriver, BrowserLauncher, DriverError, Node};
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use crate::error::BrowserError;
use crate::options::LaunchOptions;
use crate::remote::resolve_websocket_url;

const HIDE_WEBDRIVER_JS: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

const TEXT_CONTENT_FN: &str = "function() { return this.textContent; }";

const REMOTE_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Starts a fresh Chromium per launch, or attaches to a remote one.
#[derive(Debug)]
pub struct ChromiumLauncher {
    options: LaunchOptions,
    http: reqwest::Client,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(options: LaunchOptions) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REMOTE_ENDPOINT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { options, http }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(LaunchOptions::from_config(config))
    }

    #[must_use]
    pub fn options(&self) -> &LaunchOptions {
        &self.options
    }

    async fn start(&self) -> Result<ChromiumSession, BrowserError> {
        let (browser, handler, profile) = match &self.options.remote_browser_url {
            Some(endpoint) => {
                let ws_url = resolve_websocket_url(&self.http, endpoint).await?;
                let (browser, handler) = Browser::connect(ws_url).await.map_err(BrowserError::Launch)?;
                (browser, handler, None)
            }
            None => {
                let profile = tempfile::Builder::new()
                    .prefix("pricescan-profile-")
                    .tempdir()
                    .map_err(BrowserError::Profile)?;
                let config = self.options.browser_config(profile.path())?;
                let (browser, handler) = Browser::launch(config).await.map_err(BrowserError::Launch)?;
                tracing::debug!(profile = %profile.path().display(), "chromium started");
                (browser, handler, Some(profile))
            }
        };

        let mut session = ChromiumSession {
            page: None,
            browser,
            handler: spawn_handler(handler),
            profile,
            remote: self.options.remote_browser_url.is_some(),
            closed: false,
        };

        match open_tab(&session.browser, &self.options.user_agent).await {
            Ok(page) => {
                session.page = Some(page);
                Ok(session)
            }
            Err(err) => {
                if let Err(close_err) = session.close().await {
                    tracing::warn!(error = %close_err, "failed to close browser after tab setup failure");
                }
                Err(err)
            }
        }
    }
}

impl BrowserLauncher for ChromiumLauncher {
    type Driver = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession, DriverError> {
        Ok(self.start().await?)
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                tracing::debug!(error = %err, "chromium handler event error");
            }
        }
    })
}

/// Opens the single working tab with webdriver suppression and the desktop UA.
async fn open_tab(browser: &Browser, user_agent: &str) -> Result<Page, BrowserError> {
    let page = browser.new_page("about:blank").await.map_err(BrowserError::Page)?;
    page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(HIDE_WEBDRIVER_JS))
        .await
        .map_err(BrowserError::Page)?;
    page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
        .await
        .map_err(BrowserError::Page)?;
    Ok(page)
}

/// One browser driving one tab. A locally launched browser owns a temporary
/// profile directory that is removed on close or drop.
pub struct ChromiumSession {
    page: Option<Page>,
    browser: Browser,
    handler: JoinHandle<()>,
    profile: Option<TempDir>,
    remote: bool,
    closed: bool,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, DriverError> {
        match &self.page {
            Some(page) if !self.closed => Ok(page),
            _ => Err(DriverError::Closed),
        }
    }
}

impl BrowserDriver for ChromiumSession {
    type Element = ChromiumElement;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        let page = self.page()?;
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(CdpError::Timeout)) | Err(_) => Err(DriverError::Timeout {
                operation: format!("navigate {url}"),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Ok(Err(err)) => Err(DriverError::Navigation {
                url: url.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value, DriverError> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|err| DriverError::Script {
                reason: err.to_string(),
            })?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let url = self.page()?.url().await.map_err(element_error)?;
        Ok(url.unwrap_or_default())
    }

    async fn page_source(&self) -> Result<String, DriverError> {
        self.page()?.content().await.map_err(element_error)
    }

    async fn find_all(&self, css: &str) -> Result<Vec<ChromiumElement>, DriverError> {
        let elements = self.page()?.find_elements(css).await.map_err(element_error)?;
        Ok(elements.into_iter().map(ChromiumElement).collect())
    }

    async fn set_user_agent(&self, user_agent: &str) -> Result<(), DriverError> {
        self.page()?
            .set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(|err| DriverError::Script {
                reason: err.to_string(),
            })?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // A remote browser outlives the session; only our tab goes away.
        let shutdown = if self.remote {
            match self.page.take() {
                Some(page) => page.close().await.map_err(|err| err.to_string()),
                None => Ok(()),
            }
        } else {
            self.page = None;
            match self.browser.close().await {
                Ok(_) => self.browser.wait().await.map(|_| ()).map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            }
        };
        self.handler.abort();

        if let Some(profile) = self.profile.take() {
            let path = profile.path().to_path_buf();
            if let Err(err) = profile.close() {
                tracing::warn!(profile = %path.display(), error = %err, "failed to remove browser profile");
            }
        }

        shutdown.map_err(|reason| DriverError::Shutdown { reason })
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            tracing::debug!("chromium session dropped without close");
            self.handler.abort();
        }
    }
}

/// A live DOM element of a [`ChromiumSession`] tab.
#[derive(Debug)]
pub struct ChromiumElement(Element);

impl Node for ChromiumElement {
    async fn select_all(&self, css: &str) -> Result<Vec<Self>, DriverError> {
        let found = self.0.find_elements(css).await.map_err(element_error)?;
        Ok(found.into_iter().map(ChromiumElement).collect())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.0.attribute(name).await.map_err(element_error)
    }

    async fn inner_text(&self) -> Result<Option<String>, DriverError> {
        let text = self.0.inner_text().await.map_err(element_error)?;
        Ok(text.map(|t| t.split_whitespace().collect::<Vec<_>>().join(" ")).filter(|t| !t.is_empty()))
    }

    async fn text_content(&self) -> Result<Option<String>, DriverError> {
        let returns = self
            .0
            .call_js_fn(TEXT_CONTENT_FN, false)
            .await
            .map_err(element_error)?;
        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(Value::as_str)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}

fn element_error(err: CdpError) -> DriverError {
    DriverError::Element {
        reason: err.to_string(),
    }
}
