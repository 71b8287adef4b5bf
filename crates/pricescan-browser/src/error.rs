use pricescan_scraper::DriverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("invalid browser configuration: {0}")]
    Config(String),

    #[error("failed to create browser profile directory: {0}")]
    Profile(#[source] std::io::Error),

    #[error("failed to start chromium: {0}")]
    Launch(#[source] chromiumoxide::error::CdpError),

    #[error("DevTools endpoint {endpoint} request failed: {source}")]
    RemoteEndpoint {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("DevTools endpoint {endpoint} did not report a webSocketDebuggerUrl")]
    MissingDebuggerUrl { endpoint: String },

    #[error("failed to prepare the browser tab: {0}")]
    Page(#[source] chromiumoxide::error::CdpError),
}

impl From<BrowserError> for DriverError {
    fn from(err: BrowserError) -> Self {
        DriverError::Launch {
            reason: err.to_string(),
        }
    }
}
