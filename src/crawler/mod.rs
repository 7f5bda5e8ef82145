//! Crawler module for page fetching and link verification
//!
//! This module contains the core crawling logic, including:
//! - HTML parsing and link extraction
//! - Single-link verification with HEAD/GET fallback
//! - Ordered fallback across access routes
//! - Batch scheduling of link checks
//! - Overall crawl coordination and progress events
//! - Cooperative cancellation

mod cancel;
mod coordinator;
mod events;
mod fallback;
mod fetcher;
mod parser;
mod scheduler;

pub use cancel::{cancellable, ensure_active};
pub use coordinator::{check_links, CrawlOptions, CrawlReport, Crawler, PageError};
pub use events::{event_channel, CrawlEvent, EventSink, EVENT_CHANNEL_CAPACITY};
pub use fallback::first_success;
pub use fetcher::{build_http_client, fetch_page, verify_link, MAX_REDIRECTS};
pub use parser::{dedup_links, extract_links};
pub use scheduler::Scheduler;
