//! Incremental crawl progress
//!
//! The crawler reports progress as a stream of [`CrawlEvent`]s over a bounded
//! channel. Sending awaits when the consumer falls behind, and a dropped
//! receiver is not an error: the crawl simply stops reporting. A send blocked
//! on a full channel still observes the cancellation token.

use crate::crawler::cancel::cancellable;
use crate::state::LinkCheckResult;
use crate::LinkwalkError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default capacity for event channels created by callers of the crawler
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A progress update emitted while crawling
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A page was dequeued and is about to be fetched
    PageStarted { url: String, depth: u32 },

    /// One batch window of link checks finished on `page`
    BatchChecked {
        page: String,
        results: Vec<LinkCheckResult>,
        /// Links checked on this page so far
        checked: usize,
        /// Links to check on this page in total
        total: usize,
    },

    /// A page was fully processed
    PageChecked {
        url: String,
        pages_checked: usize,
        links_found: usize,
    },

    /// A page could not be fetched through any access route
    PageFailed { url: String, error: String },
}

impl CrawlEvent {
    /// Percentage of the current page's links checked, for `BatchChecked` events
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::BatchChecked { checked, total, .. } if *total > 0 => {
                Some(*checked as f64 / *total as f64 * 100.0)
            }
            Self::BatchChecked { .. } => Some(100.0),
            _ => None,
        }
    }
}

/// Optional sending half of an event channel
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::Sender<CrawlEvent>>,
}

impl EventSink {
    pub fn new(sender: Option<mpsc::Sender<CrawlEvent>>) -> Self {
        Self { sender }
    }

    /// A sink that discards every event
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Delivers an event, waiting for channel capacity if necessary
    ///
    /// Returns `Err(Cancelled)` if the token fires before the event is accepted.
    pub async fn emit(
        &self,
        event: CrawlEvent,
        token: &CancellationToken,
    ) -> Result<(), LinkwalkError> {
        if let Some(sender) = &self.sender {
            if cancellable(token, sender.send(event)).await?.is_err() {
                tracing::trace!("Event receiver dropped; progress no longer reported");
            }
        }
        Ok(())
    }
}

/// Creates a bounded event channel with the default capacity
pub fn event_channel() -> (mpsc::Sender<CrawlEvent>, mpsc::Receiver<CrawlEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}
