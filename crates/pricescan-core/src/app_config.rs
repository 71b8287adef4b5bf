use std::path::PathBuf;

pub const DEFAULT_DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

pub const DEFAULT_MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; SM-G975F) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Mobile Safari/537.36";

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub page_load_timeout_secs: u64,
    pub ready_timeout_secs: u64,
    pub load_attempts: u32,
    pub retry_pause_ms: u64,
    pub scroll_pause_ms: u64,
    pub block_signatures_path: Option<PathBuf>,
    pub chrome_executable: Option<PathBuf>,
    pub remote_browser_url: Option<String>,
    pub proxy_url: Option<String>,
    pub headless: bool,
    pub user_agent: String,
    pub mobile_user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            page_load_timeout_secs: 30,
            ready_timeout_secs: 15,
            load_attempts: 3,
            retry_pause_ms: 1_000,
            scroll_pause_ms: 1_000,
            block_signatures_path: None,
            chrome_executable: None,
            remote_browser_url: None,
            proxy_url: None,
            headless: true,
            user_agent: DEFAULT_DESKTOP_USER_AGENT.to_string(),
            mobile_user_agent: DEFAULT_MOBILE_USER_AGENT.to_string(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("page_load_timeout_secs", &self.page_load_timeout_secs)
            .field("ready_timeout_secs", &self.ready_timeout_secs)
            .field("load_attempts", &self.load_attempts)
            .field("retry_pause_ms", &self.retry_pause_ms)
            .field("scroll_pause_ms", &self.scroll_pause_ms)
            .field("block_signatures_path", &self.block_signatures_path)
            .field("chrome_executable", &self.chrome_executable)
            .field("remote_browser_url", &self.remote_browser_url)
            // Proxy URLs routinely embed credentials.
            .field("proxy_url", &self.proxy_url.as_ref().map(|_| "[redacted]"))
            .field("headless", &self.headless)
            .field("user_agent", &self.user_agent)
            .field("mobile_user_agent", &self.mobile_user_agent)
            .finish()
    }
}
