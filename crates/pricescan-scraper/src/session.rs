//! Page Session Controller: one browser session per invocation.

use std::time::Duration;

use crate::document::{LiveDocument, StaticDocument};
use crate::driver::{BrowserDriver, BrowserLauncher};
use crate::error::DriverError;
use crate::resolve::{deadline_after, next_poll};

const READY_STATE_JS: &str = "document.readyState";
const PAGE_HEIGHT_JS: &str = "document.body ? document.body.scrollHeight : 0";
const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight); true";
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Pixels scrolled when the page height has not changed since the last check.
pub const SCROLL_NUDGE_PX: u32 = 700;

/// Clicks cookie/language consent buttons whose label matches a known
/// accept phrase. Evaluates to the number of buttons clicked.
const DISMISS_OVERLAYS_JS: &str = r#"(() => {
  const labels = ["aceptar", "acepto", "aceptar todo", "accept", "accept all",
    "accept cookies", "allow all", "confirmar", "continuar", "got it", "ok"];
  let clicked = 0;
  document.querySelectorAll("button, [role='button']").forEach((el) => {
    const label = (el.innerText || el.getAttribute("aria-label") || "").trim().toLowerCase();
    if (!label || label.length > 40) return;
    if (labels.some((l) => label === l || label.startsWith(l + " "))) {
      try { el.click(); clicked += 1; } catch (e) {}
    }
  });
  return clicked;
})()"#;

/// Owns the single browser session of one scrape invocation.
///
/// Call [`PageSession::close`] on every exit path. If the session is dropped
/// instead (a panic, or the invocation future being cancelled) the driver's
/// own drop releases the browser and its profile.
pub struct PageSession<D: BrowserDriver> {
    driver: D,
    closed: bool,
}

impl<D: BrowserDriver> PageSession<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            closed: false,
        }
    }

    /// Launches a fresh session.
    ///
    /// # Errors
    ///
    /// Returns the launcher's error when no browser can be started.
    pub async fn open<L>(launcher: &L) -> Result<Self, DriverError>
    where
        L: BrowserLauncher<Driver = D>,
    {
        Ok(Self::new(launcher.launch().await?))
    }

    /// # Errors
    ///
    /// Returns [`DriverError::Timeout`] or [`DriverError::Navigation`].
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        self.driver.navigate(url, timeout).await
    }

    /// Waits until `document.readyState` is `"complete"`.
    ///
    /// Best-effort: returns `false` on timeout and the caller proceeds anyway.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = deadline_after(timeout);
        loop {
            match self.driver.evaluate(READY_STATE_JS).await {
                Ok(state) if state.as_str() == Some("complete") => return true,
                Ok(_) => {}
                Err(err) => tracing::debug!(error = %err, "readyState probe failed"),
            }
            let Some(pause) = next_poll(deadline, READY_POLL_INTERVAL) else {
                tracing::warn!(
                    timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    "document not ready before timeout, continuing"
                );
                return false;
            };
            tokio::time::sleep(pause).await;
        }
    }

    /// Scrolls to trigger lazy-loaded results until the page stops growing.
    ///
    /// Each round compares the document height with the previous
    /// measurement. While it changes, jump to the bottom. Once two
    /// consecutive checks agree, nudge down by [`SCROLL_NUDGE_PX`] and stop
    /// if that does not grow the page either. Script failures end the loop.
    /// Returns the number of rounds performed.
    pub async fn scroll_until_growth(&self, max_rounds: u32, pause: Duration) -> u32 {
        let mut last_height = 0u64;
        let mut rounds = 0;

        while rounds < max_rounds {
            rounds += 1;
            let Some(height) = self.page_height().await else {
                break;
            };

            if height == last_height {
                if self.run_script(&nudge_script()).await.is_none() {
                    break;
                }
                tokio::time::sleep(jittered(pause)).await;
                let Some(grown) = self.page_height().await else {
                    break;
                };
                if grown <= height {
                    break;
                }
                last_height = grown;
            } else {
                last_height = height;
                if self.run_script(SCROLL_TO_BOTTOM_JS).await.is_none() {
                    break;
                }
                tokio::time::sleep(jittered(pause)).await;
            }
        }

        tracing::debug!(rounds, last_height, "scroll finished");
        rounds
    }

    /// Dismisses consent/language overlays. Never fails; returns clicks made.
    pub async fn dismiss_overlays(&self) -> u64 {
        match self.driver.evaluate(DISMISS_OVERLAYS_JS).await {
            Ok(value) => value.as_u64().unwrap_or(0),
            Err(err) => {
                tracing::debug!(error = %err, "overlay dismissal failed");
                0
            }
        }
    }

    /// Switches the session's user agent for subsequent navigations.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the override is rejected.
    pub async fn use_user_agent(&self, user_agent: &str) -> Result<(), DriverError> {
        self.driver.set_user_agent(user_agent).await
    }

    /// # Errors
    ///
    /// Returns the driver error if the URL cannot be read.
    pub async fn current_url(&self) -> Result<String, DriverError> {
        self.driver.current_url().await
    }

    /// # Errors
    ///
    /// Returns the driver error if the DOM cannot be serialized.
    pub async fn page_source(&self) -> Result<String, DriverError> {
        self.driver.page_source().await
    }

    #[must_use]
    pub fn live_document(&self) -> LiveDocument<'_, D> {
        LiveDocument::new(&self.driver)
    }

    /// Snapshot of the current page source, parsed for script-free queries.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the DOM cannot be serialized.
    pub async fn static_document(&self) -> Result<StaticDocument, DriverError> {
        let source = self.driver.page_source().await?;
        Ok(StaticDocument::parse(&source))
    }

    /// Closes the browser and removes its profile.
    ///
    /// # Errors
    ///
    /// Returns the driver error; the session is considered released either way.
    pub async fn close(mut self) -> Result<(), DriverError> {
        self.closed = true;
        self.driver.close().await
    }

    async fn page_height(&self) -> Option<u64> {
        self.run_script(PAGE_HEIGHT_JS).await.and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|h| *h >= 0.0).map(truncate_height))
        })
    }

    async fn run_script(&self, script: &str) -> Option<serde_json::Value> {
        match self.driver.evaluate(script).await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(error = %err, "scroll script failed");
                None
            }
        }
    }
}

impl<D: BrowserDriver> Drop for PageSession<D> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("page session dropped without close; relying on driver cleanup");
        }
    }
}

fn nudge_script() -> String {
    format!("window.scrollBy(0, {SCROLL_NUDGE_PX}); true")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_height(h: f64) -> u64 {
    h as u64
}

/// Scales `pause` by a random factor in `[0.75, 1.25)` so scrolling does not
/// tick at a machine-regular cadence.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jittered(pause: Duration) -> Duration {
    if pause.is_zero() {
        return pause;
    }
    let ms = pause.as_millis() as f64 * (rand::random::<f64>() * 0.5 + 0.75);
    Duration::from_millis(ms as u64)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
