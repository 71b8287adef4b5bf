pub mod assemble;
pub mod block;
pub mod document;
pub mod driver;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod platforms;
pub mod resolve;
pub mod retry;
pub mod selector;
pub mod session;

pub use assemble::{absolute_link, assemble, CardFields, RecordContext};
pub use block::{BlockDetector, BlockReason};
pub use document::{Document, LiveDocument, Node, StaticDocument, StaticNode};
pub use driver::{BrowserDriver, BrowserLauncher};
pub use engine::{ScrapeSettings, Scraper};
pub use error::{CardError, DriverError, ScraperError};
pub use normalize::{parse_price, parse_price_range, parse_quantity, PriceRange};
pub use selector::SelectorChain;
pub use session::PageSession;
