//! Chromium launch flags derived from [`AppConfig`].

use std::path::{Path, PathBuf};

use chromiumoxide::BrowserConfig;
use pricescan_core::AppConfig;

use crate::error::BrowserError;

pub const WINDOW_WIDTH: u32 = 1366;
pub const WINDOW_HEIGHT: u32 = 900;
pub const BROWSER_LANGUAGE: &str = "es-ES";

/// Everything needed to start or reach a browser for one session.
#[derive(Clone)]
pub struct LaunchOptions {
    pub chrome_executable: Option<PathBuf>,
    pub remote_browser_url: Option<String>,
    pub proxy_url: Option<String>,
    pub headless: bool,
    pub user_agent: String,
    pub language: String,
    pub window: (u32, u32),
}

impl LaunchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chrome_executable: config.chrome_executable.clone(),
            remote_browser_url: config.remote_browser_url.clone(),
            proxy_url: config.proxy_url.clone(),
            headless: config.headless,
            user_agent: config.user_agent.clone(),
            language: BROWSER_LANGUAGE.to_string(),
            window: (WINDOW_WIDTH, WINDOW_HEIGHT),
        }
    }

    /// Builds the chromiumoxide config for a local launch using `profile_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Config`] when chromiumoxide rejects the
    /// combination of options.
    pub fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(self.window.0, self.window.1)
            .user_data_dir(profile_dir)
            .args(browser_args(self));
        if let Some(executable) = &self.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        if !self.headless {
            builder = builder.with_head();
        }
        builder.build().map_err(BrowserError::Config)
    }
}

impl std::fmt::Debug for LaunchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchOptions")
            .field("chrome_executable", &self.chrome_executable)
            .field("remote_browser_url", &self.remote_browser_url)
            .field("proxy_url", &self.proxy_url.as_ref().map(|_| "[redacted]"))
            .field("headless", &self.headless)
            .field("user_agent", &self.user_agent)
            .field("language", &self.language)
            .field("window", &self.window)
            .finish()
    }
}

/// Extra command-line flags on top of chromiumoxide's defaults.
#[must_use]
pub fn browser_args(options: &LaunchOptions) -> Vec<String> {
    let mut args = vec![
        format!("--lang={}", options.language),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        format!("--user-agent={}", options.user_agent),
    ];
    if let Some(proxy) = options.proxy_url.as_deref().filter(|p| !p.trim().is_empty()) {
        args.push(format!("--proxy-server={}", proxy.trim()));
    }
    args
}
