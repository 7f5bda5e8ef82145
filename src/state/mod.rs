//! State management module
//!
//! This module defines the data a crawl produces and the traversal state it
//! keeps while running.

mod queue;
mod result;

pub use queue::{PageQueue, PageQueueEntry};
pub use result::LinkCheckResult;
