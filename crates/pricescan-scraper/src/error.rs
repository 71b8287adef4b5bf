use thiserror::Error;

/// Failures reported by a browser/document provider.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("script evaluation failed: {reason}")]
    Script { reason: String },

    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("element query failed: {reason}")]
    Element { reason: String },

    #[error("browser session could not be started: {reason}")]
    Launch { reason: String },

    #[error("browser session is closed")]
    Closed,

    #[error("browser shutdown failed: {reason}")]
    Shutdown { reason: String },
}

impl DriverError {
    /// Whether retrying the same operation could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            DriverError::Timeout { .. }
            | DriverError::Navigation { .. }
            | DriverError::Script { .. }
            | DriverError::Element { .. } => true,
            DriverError::InvalidSelector { .. }
            | DriverError::Launch { .. }
            | DriverError::Closed
            | DriverError::Shutdown { .. } => false,
        }
    }
}

/// Fatal, invocation-level failures. Page and card problems never surface here.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("failed to establish browser session: {0}")]
    SessionLaunch(#[source] DriverError),

    #[error("search query must be non-empty")]
    InvalidQuery,

    #[error("page count must be at least 1, got {0}")]
    InvalidPageCount(u32),
}

/// Reasons a single card is dropped during extraction.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("card has no product link")]
    MissingLink,

    #[error("card is a sponsored placement")]
    Advertisement,

    #[error(transparent)]
    Driver(#[from] DriverError),
}
