//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop that ties everything
//! together:
//! - Seeding and draining the page queue
//! - Fetching each page through the ordered access routes
//! - Extracting and verifying links in batch windows
//! - Feeding same-site pages back into the queue
//! - Observing cancellation at every loop boundary

use crate::config::{validate, Config};
use crate::crawler::cancel::ensure_active;
use crate::crawler::events::{CrawlEvent, EventSink};
use crate::crawler::fallback::first_success;
use crate::crawler::fetcher::{build_http_client, fetch_page, verify_link};
use crate::crawler::parser::{dedup_links, extract_links};
use crate::crawler::scheduler::Scheduler;
use crate::state::{LinkCheckResult, PageQueue, PageQueueEntry};
use crate::url::{has_excluded_extension, parse_start_url, same_site, AccessRoute};
use crate::{LinkwalkError, UrlError};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Per-invocation crawl options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Follow same-site links to further pages
    pub recursive: bool,

    /// Maximum page depth visited when recursive (start page is depth 0)
    pub max_depth: u32,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 3,
        }
    }
}

/// A page that could not be fetched through any route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageError {
    pub url: String,
    pub message: String,
}

/// Aggregated outcome of a crawl
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Every link check, in the order pages and windows were processed
    pub results: Vec<LinkCheckResult>,

    /// Pages fetched and processed (pages with zero links included)
    pub pages_checked: usize,

    /// Pages that could not be fetched
    pub page_errors: Vec<PageError>,
}

impl CrawlReport {
    pub fn working_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_working).count()
    }

    pub fn broken_count(&self) -> usize {
        self.results.len() - self.working_count()
    }
}

/// Main crawler structure
///
/// Holds the shared HTTP client and settings; every call to [`Crawler::crawl`]
/// gets its own queue, visited set and results.
pub struct Crawler {
    config: Arc<Config>,
    client: Client,
    routes: Vec<AccessRoute>,
}

impl Crawler {
    /// Creates a crawler with a client built from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Configuration is valid and the client was built
    /// * `Err(LinkwalkError)` - Invalid configuration or client setup failure
    pub fn new(config: Config) -> Result<Self, LinkwalkError> {
        let client = build_http_client(&config.user_agent)?;
        Self::with_client(config, client)
    }

    /// Creates a crawler that uses the given HTTP client
    pub fn with_client(config: Config, client: Client) -> Result<Self, LinkwalkError> {
        validate(&config)?;
        let routes = AccessRoute::parse_all(&config.access.routes)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            routes,
        })
    }

    /// The ordered access routes tried for each page
    pub fn routes(&self) -> &[AccessRoute] {
        &self.routes
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a crawl from `start_url`
    ///
    /// Pages are visited one at a time in breadth-first order. Each page is
    /// fetched through the first working access route, its links are verified in
    /// batch windows through that same route, and, when `options.recursive` is set
    /// and the page is shallower than `options.max_depth`, its working same-site
    /// links that do not point at binary assets are queued one level deeper.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The queue drained; page failures are inside the report
    /// * `Err(LinkwalkError::Url)` - The start URL is invalid (no request was made)
    /// * `Err(LinkwalkError::Cancelled)` - The token fired
    pub async fn crawl(
        &self,
        start_url: &str,
        options: CrawlOptions,
        events: Option<mpsc::Sender<CrawlEvent>>,
        token: &CancellationToken,
    ) -> Result<CrawlReport, LinkwalkError> {
        let start = parse_start_url(start_url)?;
        let events = EventSink::new(events);
        let scheduler = Scheduler::new(self.config.checker.batch_size);
        let mut queue = PageQueue::seeded(start.as_str());
        let mut report = CrawlReport::default();
        let started = Instant::now();

        tracing::info!(
            "Starting {} check of {} (max depth {}, {} route(s))",
            if options.recursive { "recursive" } else { "single-page" },
            start,
            options.max_depth,
            self.routes.len()
        );

        loop {
            ensure_active(token)?;
            let Some(entry) = queue.next_unvisited() else {
                tracing::info!("Page queue is empty, crawl complete");
                break;
            };

            self.visit_page(
                &start,
                &entry,
                options,
                &scheduler,
                &mut queue,
                &mut report,
                &events,
                token,
            )
            .await?;
        }

        tracing::info!(
            "Checked {} links on {} pages in {:?}: {} broken, {} page errors",
            report.results.len(),
            report.pages_checked,
            started.elapsed(),
            report.broken_count(),
            report.page_errors.len()
        );

        Ok(report)
    }

    /// Processes one dequeued page
    #[allow(clippy::too_many_arguments)]
    async fn visit_page(
        &self,
        start: &Url,
        entry: &PageQueueEntry,
        options: CrawlOptions,
        scheduler: &Scheduler,
        queue: &mut PageQueue,
        report: &mut CrawlReport,
        events: &EventSink,
        token: &CancellationToken,
    ) -> Result<(), LinkwalkError> {
        let page = entry.url.as_str();
        tracing::info!("Checking page {} (depth {})", page, entry.depth);
        events
            .emit(
                CrawlEvent::PageStarted {
                    url: page.to_string(),
                    depth: entry.depth,
                },
                token,
            )
            .await?;

        let page_timeout = Duration::from_millis(self.config.checker.page_timeout_ms);
        let fetched = first_success(&self.routes, token, |route| {
            fetch_page(&self.client, route, page, page_timeout, token)
        })
        .await;

        let (route, body) = match fetched {
            Ok(found) => found,
            Err(LinkwalkError::Cancelled) => return Err(LinkwalkError::Cancelled),
            Err(e) => {
                tracing::warn!("Failed to fetch page {}: {}", page, e);
                report.page_errors.push(PageError {
                    url: page.to_string(),
                    message: e.to_string(),
                });
                events
                    .emit(
                        CrawlEvent::PageFailed {
                            url: page.to_string(),
                            error: e.to_string(),
                        },
                        token,
                    )
                    .await?;
                return Ok(());
            }
        };
        tracing::debug!("Fetched {} via {}", page, route);

        let base = Url::parse(page).map_err(|e| UrlError::Parse(e.to_string()))?;
        let mut links = dedup_links(extract_links(&body, &base, self.config.checker.extractor));
        let links_found = links.len();

        let limit = self.config.checker.page_link_limit;
        if !options.recursive && links.len() > limit {
            tracing::info!(
                "Found {} links on {}, checking the first {}",
                links_found,
                page,
                limit
            );
            links.truncate(limit);
        }

        let link_timeout = Duration::from_millis(self.config.checker.link_timeout_ms);
        let results = scheduler
            .run(page, &links, token, events, |url| async move {
                verify_link(&self.client, route, &url, Some(page), link_timeout, token).await
            })
            .await?;

        if options.recursive && entry.depth < options.max_depth {
            ensure_active(token)?;
            for result in results.iter().filter(|r| r.is_working) {
                if self.is_crawl_target(start, &result.url) && queue.enqueue_child(&result.url, entry.depth) {
                    tracing::debug!("Queued {} at depth {}", result.url, entry.depth + 1);
                }
            }
        }

        report.results.extend(results);
        report.pages_checked += 1;
        events
            .emit(
                CrawlEvent::PageChecked {
                    url: page.to_string(),
                    pages_checked: report.pages_checked,
                    links_found,
                },
                token,
            )
            .await?;

        Ok(())
    }

    /// Returns true if a verified link should be visited as a page
    fn is_crawl_target(&self, start: &Url, link: &str) -> bool {
        match Url::parse(link) {
            Ok(url) => {
                same_site(start, &url)
                    && !has_excluded_extension(&url, &self.config.checker.extra_excluded_extensions)
            }
            Err(_) => false,
        }
    }
}

/// Checks the links on `url` (and its site, when recursive) with default settings
///
/// This is the top-level convenience entry point; use [`Crawler`] directly to
/// supply a configuration.
///
/// # Example
///
/// ```no_run
/// use linkwalk::{check_links, CancellationToken, CrawlOptions};
///
/// # async fn example() -> linkwalk::Result<()> {
/// let token = CancellationToken::new();
/// let report = check_links("https://example.com/", CrawlOptions::default(), None, &token).await?;
/// println!("{} broken links", report.broken_count());
/// # Ok(())
/// # }
/// ```
pub async fn check_links(
    url: &str,
    options: CrawlOptions,
    events: Option<mpsc::Sender<CrawlEvent>>,
    token: &CancellationToken,
) -> Result<CrawlReport, LinkwalkError> {
    let start = parse_start_url(url)?;
    Crawler::new(Config::default())?
        .crawl(start.as_str(), options, events, token)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> Crawler {
        Crawler::new(Config::default()).unwrap()
    }

    #[test]
    fn test_default_options() {
        let options = CrawlOptions::default();
        assert!(!options.recursive);
        assert_eq!(options.max_depth, 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.checker.batch_size = 0;
        assert!(matches!(
            Crawler::new(config),
            Err(LinkwalkError::Config(_))
        ));
    }

    #[test]
    fn test_routes_follow_config_order() {
        let mut config = Config::default();
        config.access.routes = vec![
            "https://proxy.test/?u=".to_string(),
            "direct".to_string(),
        ];
        let crawler = Crawler::new(config).unwrap();
        assert_eq!(
            crawler.routes(),
            &[
                AccessRoute::Prefix("https://proxy.test/?u=".to_string()),
                AccessRoute::Direct
            ]
        );
    }

    #[test]
    fn test_is_crawl_target() {
        let crawler = crawler();
        let start = Url::parse("https://site.test/").unwrap();
        assert!(crawler.is_crawl_target(&start, "https://site.test/about"));
        assert!(!crawler.is_crawl_target(&start, "https://other.test/"));
        assert!(!crawler.is_crawl_target(&start, "https://site.test/brochure.pdf"));
        assert!(!crawler.is_crawl_target(&start, "not a url"));
    }

    #[test]
    fn test_report_counts() {
        let report = CrawlReport {
            results: vec![
                LinkCheckResult::from_status("https://a.test/", reqwest::StatusCode::OK, None),
                LinkCheckResult::transport_failure("https://b.test/", "Request timeout", None),
            ],
            pages_checked: 1,
            page_errors: vec![],
        };
        assert_eq!(report.working_count(), 1);
        assert_eq!(report.broken_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_start_url_rejected_before_network() {
        let token = CancellationToken::new();
        let result = crawler()
            .crawl("not a url", CrawlOptions::default(), None, &token)
            .await;
        assert!(matches!(result, Err(LinkwalkError::Url(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let result = crawler()
            .crawl("https://site.test/", CrawlOptions::default(), None, &token)
            .await;
        assert!(matches!(result, Err(LinkwalkError::Cancelled)));
    }
}
