//! In-memory browser for driving the engine end to end.
//!
//! Pages are plain HTML keyed by URL. The live document is served by the
//! same HTML parser the static pass uses, so a test page behaves the same
//! on both paths unless `hide_live_elements` is set.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pricescan_scraper::document::collapse_text;
use pricescan_scraper::{BrowserDriver, BrowserLauncher, DriverError, Node};
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};

const EMPTY_PAGE: &str = "<html><head></head><body></body></html>";

#[derive(Default)]
pub struct BrowserState {
    pages: HashMap<String, String>,
    timeouts: HashMap<String, u32>,
    unreadable_sources: HashSet<String>,
    current_url: String,
    pub navigations: Vec<String>,
    pub user_agents: Vec<String>,
    pub launches: u32,
    pub closed: bool,
    pub hide_live_elements: bool,
}

/// Shared handle: configure pages before the run, inspect state after.
#[derive(Clone, Default)]
pub struct FakeWeb {
    state: Arc<Mutex<BrowserState>>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.state().pages.insert(url.into(), html.into());
        self
    }

    /// The next `count` navigations to `url` time out.
    pub fn timeouts(self, url: impl Into<String>, count: u32) -> Self {
        self.state().timeouts.insert(url.into(), count);
        self
    }

    /// `page_source` fails while `url` is loaded.
    pub fn unreadable_source(self, url: impl Into<String>) -> Self {
        self.state().unreadable_sources.insert(url.into());
        self
    }

    pub fn hide_live_elements(self) -> Self {
        self.state().hide_live_elements = true;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().expect("browser state lock poisoned")
    }

    pub fn launcher(&self) -> FakeLauncher {
        FakeLauncher {
            web: self.clone(),
            fail: false,
        }
    }

    pub fn failing_launcher(&self) -> FakeLauncher {
        FakeLauncher {
            web: self.clone(),
            fail: true,
        }
    }
}

pub struct FakeLauncher {
    web: FakeWeb,
    fail: bool,
}

impl BrowserLauncher for FakeLauncher {
    type Driver = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser, DriverError> {
        if self.fail {
            return Err(DriverError::Launch {
                reason: "chromium not found".to_string(),
            });
        }
        self.web.state().launches += 1;
        Ok(FakeBrowser { web: self.web.clone() })
    }
}

pub struct FakeBrowser {
    web: FakeWeb,
}

impl FakeBrowser {
    fn current_html(&self) -> String {
        let state = self.web.state();
        state
            .pages
            .get(&state.current_url)
            .cloned()
            .unwrap_or_else(|| EMPTY_PAGE.to_string())
    }
}

impl BrowserDriver for FakeBrowser {
    type Element = FakeElement;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.web.state();
        state.navigations.push(url.to_string());
        if let Some(remaining) = state.timeouts.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::Timeout {
                    operation: "navigate".to_string(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
        }
        state.current_url = url.to_string();
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, DriverError> {
        if script == "document.readyState" {
            return Ok(json!("complete"));
        }
        if script.contains("scrollHeight") && !script.contains("window.scroll") {
            return Ok(json!(1000));
        }
        if script.contains("querySelectorAll") {
            return Ok(json!(0));
        }
        Ok(json!(true))
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.web.state().current_url.clone())
    }

    async fn page_source(&self) -> Result<String, DriverError> {
        {
            let state = self.web.state();
            if state.unreadable_sources.contains(&state.current_url) {
                return Err(DriverError::Script {
                    reason: "DOM.getOuterHTML: target crashed".to_string(),
                });
            }
        }
        Ok(self.current_html())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<FakeElement>, DriverError> {
        if self.web.state().hide_live_elements {
            return Ok(Vec::new());
        }
        let selector = parse(css)?;
        let html = Html::parse_document(&self.current_html());
        Ok(html
            .select(&selector)
            .map(|el| FakeElement { html: el.html() })
            .collect())
    }

    async fn set_user_agent(&self, user_agent: &str) -> Result<(), DriverError> {
        self.web.state().user_agents.push(user_agent.to_string());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.web.state().closed = true;
        Ok(())
    }
}

/// A live element, held as its outer HTML.
pub struct FakeElement {
    html: String,
}

impl FakeElement {
    fn with_top<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let fragment = Html::parse_fragment(&self.html);
        let top = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)?;
        Some(f(top))
    }
}

impl Node for FakeElement {
    async fn select_all(&self, css: &str) -> Result<Vec<Self>, DriverError> {
        let selector = parse(css)?;
        Ok(self
            .with_top(|top| {
                top.select(&selector)
                    .filter(|el| el.id() != top.id())
                    .map(|el| FakeElement { html: el.html() })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self
            .with_top(|top| top.value().attr(name).map(str::to_string))
            .flatten())
    }

    async fn inner_text(&self) -> Result<Option<String>, DriverError> {
        Ok(self.with_top(collapse_text).filter(|t| !t.is_empty()))
    }

    async fn text_content(&self) -> Result<Option<String>, DriverError> {
        Ok(self
            .with_top(|top| top.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}

fn parse(css: &str) -> Result<Selector, DriverError> {
    Selector::parse(css).map_err(|e| DriverError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}
