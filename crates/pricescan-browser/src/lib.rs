//! Chromium provider for the scraper's browser contracts.
//!
//! [`ChromiumLauncher`] either starts a local Chromium with a throwaway
//! profile or attaches to an already-running browser through its DevTools
//! endpoint. Each launch yields one [`ChromiumSession`] driving a single tab.

pub mod error;
pub mod options;
pub mod remote;
pub mod session;

pub use error::BrowserError;
pub use options::{browser_args, LaunchOptions};
pub use remote::resolve_websocket_url;
pub use session::{ChromiumElement, ChromiumLauncher, ChromiumSession};
