//! The scrape entry point and the page loop shared by every marketplace.
//!
//! Per page index: build the URL, load it with a capped retry, gate on the
//! block detector (switching to the alternate host where one exists),
//! extract cards from the live document, and fall back to a static parse of
//! the same source when the live pass produced nothing. Page and card
//! failures are logged and skipped; only session launch is fatal.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use pricescan_core::{AppConfig, Platform, ProductRecord, DEFAULT_DESKTOP_USER_AGENT, DEFAULT_MOBILE_USER_AGENT};

use crate::assemble::{assemble, RecordContext};
use crate::block::{BlockDetector, BlockReason};
use crate::document::Node;
use crate::driver::{BrowserDriver, BrowserLauncher};
use crate::error::{DriverError, ScraperError};
use crate::platforms::{host_of, AliExpress, Alibaba, MadeInChina, Marketplace, Temu};
use crate::resolve::find_all_any;
use crate::retry::retry_with_attempt_cap;
use crate::session::PageSession;

/// Timing and behaviour knobs for one scrape invocation.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub page_load_timeout: Duration,
    pub ready_timeout: Duration,
    /// How long the live pass keeps polling for card containers.
    pub card_wait: Duration,
    pub load_attempts: u32,
    pub retry_pause: Duration,
    pub scroll_pause: Duration,
    pub dismiss_overlays: bool,
    pub desktop_user_agent: String,
    pub mobile_user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(30),
            ready_timeout: Duration::from_secs(15),
            card_wait: Duration::from_secs(8),
            load_attempts: 3,
            retry_pause: Duration::from_secs(1),
            scroll_pause: Duration::from_secs(1),
            dismiss_overlays: true,
            desktop_user_agent: DEFAULT_DESKTOP_USER_AGENT.to_string(),
            mobile_user_agent: DEFAULT_MOBILE_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
            load_attempts: config.load_attempts,
            retry_pause: Duration::from_millis(config.retry_pause_ms),
            scroll_pause: Duration::from_millis(config.scroll_pause_ms),
            desktop_user_agent: config.user_agent.clone(),
            mobile_user_agent: config.mobile_user_agent.clone(),
            ..Self::default()
        }
    }
}

enum PageOutcome {
    Records(Vec<ProductRecord>),
    /// All load attempts failed; move on to the next page.
    Skipped,
    /// A page confirmed clean by the block check on which neither the live
    /// nor the static pass found a result container.
    Exhausted,
}

/// What the block check could establish about a loaded page.
enum BlockCheck {
    Clear,
    Blocked(BlockReason),
    /// The page source could not be read and the URL alone matched nothing.
    Unknown,
}

struct PageContext<'q> {
    query: &'q str,
    record: RecordContext,
}

/// Runs scrape invocations, each on a fresh session from `launcher`.
pub struct Scraper<L> {
    launcher: L,
    settings: ScrapeSettings,
    detector: BlockDetector,
}

impl<L: BrowserLauncher> Scraper<L> {
    pub fn new(launcher: L, settings: ScrapeSettings, detector: BlockDetector) -> Self {
        Self {
            launcher,
            settings,
            detector,
        }
    }

    /// Scrapes up to `max_pages` result pages of `query` on `platform`.
    ///
    /// Records come back in page order, then document order within a page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidQuery`] for a blank query
    /// - [`ScraperError::InvalidPageCount`] when `max_pages` is 0
    /// - [`ScraperError::SessionLaunch`] when no browser session can be opened
    pub async fn scrape(
        &self,
        platform: Platform,
        query: &str,
        max_pages: u32,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        match platform {
            Platform::AliExpress => self.scrape_with(&AliExpress, query, max_pages).await,
            Platform::Alibaba => self.scrape_with(&Alibaba, query, max_pages).await,
            Platform::Temu => self.scrape_with(&Temu, query, max_pages).await,
            Platform::MadeInChina => self.scrape_with(&MadeInChina, query, max_pages).await,
        }
    }

    /// [`Self::scrape`] for a statically chosen marketplace.
    ///
    /// # Errors
    ///
    /// See [`Self::scrape`].
    pub async fn scrape_with<M: Marketplace>(
        &self,
        marketplace: &M,
        query: &str,
        max_pages: u32,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScraperError::InvalidQuery);
        }
        if max_pages == 0 {
            return Err(ScraperError::InvalidPageCount(max_pages));
        }

        let session = PageSession::open(&self.launcher)
            .await
            .map_err(ScraperError::SessionLaunch)?;

        let scrape_date = Local::now().date_naive();
        let records = self
            .run_pages(&session, marketplace, query, max_pages, scrape_date)
            .await;

        if let Err(err) = session.close().await {
            tracing::warn!(platform = %M::PLATFORM, error = %err, "failed to close browser session");
        }

        tracing::info!(
            platform = %M::PLATFORM,
            query,
            records = records.len(),
            "scrape finished"
        );
        Ok(records)
    }

    async fn run_pages<D: BrowserDriver, M: Marketplace>(
        &self,
        session: &PageSession<D>,
        marketplace: &M,
        query: &str,
        max_pages: u32,
        scrape_date: NaiveDate,
    ) -> Vec<ProductRecord> {
        let mut records = Vec::new();
        let mut mobile_agent_active = false;

        for page_index in 1..=max_pages {
            if mobile_agent_active {
                match session.use_user_agent(&self.settings.desktop_user_agent).await {
                    Ok(()) => mobile_agent_active = false,
                    Err(err) => tracing::warn!(page = page_index, error = %err, "failed to restore desktop user agent"),
                }
            }

            let ctx = PageContext {
                query,
                record: RecordContext {
                    platform: M::PLATFORM,
                    page_index,
                    scrape_date,
                },
            };

            let (outcome, switched) = self.scrape_page(session, marketplace, &ctx).await;
            mobile_agent_active |= switched;

            match outcome {
                PageOutcome::Records(mut page_records) => records.append(&mut page_records),
                PageOutcome::Skipped => {}
                PageOutcome::Exhausted => {
                    tracing::info!(
                        platform = %M::PLATFORM,
                        page = page_index,
                        "no result containers on a clean page, stopping pagination"
                    );
                    break;
                }
            }
        }

        records
    }

    /// Returns the page outcome and whether the mobile user agent was applied.
    async fn scrape_page<D: BrowserDriver, M: Marketplace>(
        &self,
        session: &PageSession<D>,
        marketplace: &M,
        ctx: &PageContext<'_>,
    ) -> (PageOutcome, bool) {
        let page = ctx.record.page_index;
        let url = marketplace.search_url(ctx.query, page);
        tracing::info!(platform = %M::PLATFORM, page, url = %url, "loading results page");

        if let Err(err) = self.load(session, &url, M::MAX_SCROLL_ROUNDS).await {
            tracing::error!(
                platform = %M::PLATFORM,
                page,
                attempts = self.settings.load_attempts,
                error = %err,
                "page skipped after failed loads"
            );
            return (PageOutcome::Skipped, false);
        }

        let check = self.block_check(session).await;
        let mut switched = false;
        if let BlockCheck::Blocked(reason) = &check {
            tracing::warn!(platform = %M::PLATFORM, page, reason = %reason, "block page detected");
            if let Some(alternate) = marketplace.alternate_url(ctx.query, page) {
                switched = self.switch_to_alternate(session, &alternate, M::MAX_SCROLL_ROUNDS).await;
            }
        }

        let host = match session.current_url().await {
            Ok(current) => host_of(&current),
            Err(err) => {
                tracing::debug!(page, error = %err, "current url unavailable");
                String::new()
            }
        };

        let live = session.live_document();
        let live_cards = find_all_any(&live, marketplace.container_chains(&host), self.settings.card_wait).await;
        let live_count = live_cards.len();
        tracing::info!(platform = %M::PLATFORM, page, candidates = live_count, "live containers located");
        let mut records = extract_cards(marketplace, &live_cards, &ctx.record).await;

        let mut static_count = 0;
        let mut static_ran = false;
        if records.is_empty() {
            tracing::info!(platform = %M::PLATFORM, page, "no records from live document, trying static snapshot");
            match session.static_document().await {
                Ok(doc) => {
                    static_ran = true;
                    let cards = find_all_any(&doc, marketplace.static_container_chains(&host), Duration::ZERO).await;
                    static_count = cards.len();
                    records = extract_cards(marketplace, &cards, &ctx.record).await;
                }
                Err(err) => tracing::warn!(page, error = %err, "page source unavailable for static pass"),
            }
        }

        tracing::info!(platform = %M::PLATFORM, page, valid = records.len(), "page extracted");

        let clean = matches!(check, BlockCheck::Clear);
        if clean && static_ran && live_count == 0 && static_count == 0 {
            return (PageOutcome::Exhausted, switched);
        }
        (PageOutcome::Records(records), switched)
    }

    /// Navigate, wait for readiness, dismiss overlays and scroll, retried as
    /// one unit.
    async fn load<D: BrowserDriver>(
        &self,
        session: &PageSession<D>,
        url: &str,
        scroll_rounds: u32,
    ) -> Result<(), DriverError> {
        let settings = &self.settings;
        let attempt_load = async |attempt: u32| -> Result<(), DriverError> {
            tracing::debug!(attempt, url, "navigating");
            session.navigate(url, settings.page_load_timeout).await?;
            session.wait_ready(settings.ready_timeout).await;
            if settings.dismiss_overlays {
                let clicked = session.dismiss_overlays().await;
                if clicked > 0 {
                    tracing::debug!(clicked, "dismissed overlays");
                }
            }
            session.scroll_until_growth(scroll_rounds, settings.scroll_pause).await;
            Ok(())
        };
        retry_with_attempt_cap(settings.load_attempts, settings.retry_pause, attempt_load).await
    }

    async fn block_check<D: BrowserDriver>(&self, session: &PageSession<D>) -> BlockCheck {
        let url = session.current_url().await.unwrap_or_default();
        match session.page_source().await {
            Ok(source) => match self.detector.detect(&url, &source) {
                Some(reason) => BlockCheck::Blocked(reason),
                None => BlockCheck::Clear,
            },
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "page source unavailable, block state unknown");
                match self.detector.detect(&url, "") {
                    Some(reason) => BlockCheck::Blocked(reason),
                    None => BlockCheck::Unknown,
                }
            }
        }
    }

    /// Reloads the page on the alternate host under the mobile user agent.
    /// Returns whether the user agent was switched.
    async fn switch_to_alternate<D: BrowserDriver>(
        &self,
        session: &PageSession<D>,
        url: &str,
        scroll_rounds: u32,
    ) -> bool {
        tracing::warn!(url, "switching to alternate host");

        let switched = match session.use_user_agent(&self.settings.mobile_user_agent).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "mobile user agent override failed");
                false
            }
        };

        match session.navigate(url, self.settings.page_load_timeout).await {
            Ok(()) => {
                session.wait_ready(self.settings.ready_timeout).await;
                session.scroll_until_growth(scroll_rounds, self.settings.scroll_pause).await;
            }
            Err(err) => tracing::warn!(url, error = %err, "alternate host failed to load"),
        }
        switched
    }
}

/// Extracts every card, dropping the ones that fail.
async fn extract_cards<M: Marketplace, N: Node>(
    marketplace: &M,
    cards: &[N],
    ctx: &RecordContext,
) -> Vec<ProductRecord> {
    let mut records = Vec::with_capacity(cards.len());
    for (index, card) in cards.iter().enumerate() {
        match marketplace.extract_card(card).await {
            Ok(fields) => records.push(assemble(fields, ctx)),
            Err(err) => tracing::debug!(page = ctx.page_index, card = index, reason = %err, "card dropped"),
        }
    }
    records
}
