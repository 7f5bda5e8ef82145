//! Batch scheduler for link verification
//!
//! This module handles:
//! - Partitioning a page's links into fixed-size windows
//! - Running every check in a window concurrently
//! - Strict window ordering (window N+1 starts after window N settles)
//! - Progress reporting after each window
//! - Cancellation checks between windows

use crate::crawler::cancel::ensure_active;
use crate::crawler::events::{CrawlEvent, EventSink};
use crate::state::LinkCheckResult;
use crate::LinkwalkError;
use futures::future::join_all;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Drives link checks in bounded concurrent windows
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    batch_size: usize,
}

impl Scheduler {
    /// Creates a scheduler running at most `batch_size` checks at a time
    ///
    /// A batch size of zero is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Checks every URL in `urls`, window by window
    ///
    /// Results come back in input order, one per URL, regardless of the order in
    /// which the checks inside a window complete. After each window a
    /// [`CrawlEvent::BatchChecked`] carrying that window's results is emitted.
    ///
    /// # Returns
    ///
    /// * `Ok(results)` - Every URL was checked
    /// * `Err(LinkwalkError::Cancelled)` - The token fired before or during a window,
    ///   or while waiting to deliver a progress event
    pub async fn run<F, Fut>(
        &self,
        page: &str,
        urls: &[String],
        token: &CancellationToken,
        events: &EventSink,
        check: F,
    ) -> Result<Vec<LinkCheckResult>, LinkwalkError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<LinkCheckResult, LinkwalkError>>,
    {
        let total = urls.len();
        let mut results = Vec::with_capacity(total);

        for window in urls.chunks(self.batch_size) {
            ensure_active(token)?;

            let settled = join_all(window.iter().map(|url| check(url.clone()))).await;
            let window_results = settled.into_iter().collect::<Result<Vec<_>, _>>()?;

            results.extend(window_results.iter().cloned());
            tracing::debug!(
                "Checked {}/{} links on {} ({:.0}%)",
                results.len(),
                total,
                page,
                results.len() as f64 / total as f64 * 100.0
            );

            events
                .emit(
                    CrawlEvent::BatchChecked {
                        page: page.to_string(),
                        results: window_results,
                        checked: results.len(),
                        total,
                    },
                    token,
                )
                .await?;
        }

        Ok(results)
    }
}
