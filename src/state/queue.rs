//! Breadth-first page queue for a single crawl
//!
//! Pairs a FIFO of pending page visits with the set of pages already
//! processed. Both live exactly as long as one crawl invocation.

use std::collections::{HashSet, VecDeque};

/// A page pending a crawl visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQueueEntry {
    /// Absolute page URL
    pub url: String,

    /// Number of page-to-page hops from the start URL
    pub depth: u32,
}

/// FIFO worklist plus visited set
#[derive(Debug, Default)]
pub struct PageQueue {
    pending: VecDeque<PageQueueEntry>,
    visited: HashSet<String>,
}

impl PageQueue {
    /// Creates a queue seeded with the start page at depth 0
    pub fn seeded(start_url: impl Into<String>) -> Self {
        let mut queue = Self::default();
        queue.pending.push_back(PageQueueEntry {
            url: start_url.into(),
            depth: 0,
        });
        queue
    }

    /// Pops entries until one that has not been visited is found, marking it visited
    ///
    /// Entries for already-visited pages are discarded without further effect.
    pub fn next_unvisited(&mut self) -> Option<PageQueueEntry> {
        while let Some(entry) = self.pending.pop_front() {
            if self.visited.insert(entry.url.clone()) {
                return Some(entry);
            }
            tracing::trace!("Skipping already visited page {}", entry.url);
        }
        None
    }

    /// Queues a child page of a page at `parent_depth`
    ///
    /// Returns false (and queues nothing) if the page was already visited.
    /// Duplicate pending entries are allowed; only the first dequeue counts.
    pub fn enqueue_child(&mut self, url: impl Into<String>, parent_depth: u32) -> bool {
        let url = url.into();
        if self.visited.contains(&url) {
            return false;
        }
        self.pending.push_back(PageQueueEntry {
            url,
            depth: parent_depth + 1,
        });
        true
    }
}

#[cfg(test)]
impl PageQueue {
    fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Pending entries, duplicates included
    fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
