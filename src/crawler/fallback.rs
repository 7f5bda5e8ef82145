//! Ordered fallback over candidate strategies
//!
//! Tries each candidate in turn and keeps the first that succeeds. The
//! combinator knows nothing about what a candidate is; the crawler uses it with
//! access routes, tests use it with plain values.

use crate::crawler::cancel::ensure_active;
use crate::LinkwalkError;
use std::fmt::Display;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs `attempt` against each candidate in order until one succeeds
///
/// Returns the winning candidate together with its output. The token is checked
/// before every attempt, and a `Cancelled` error from an attempt stops the loop
/// immediately. When every candidate fails the last failure is reported in
/// [`LinkwalkError::RoutesExhausted`].
pub async fn first_success<'a, C, T, F, Fut>(
    candidates: &'a [C],
    token: &CancellationToken,
    mut attempt: F,
) -> Result<(&'a C, T), LinkwalkError>
where
    C: Display,
    F: FnMut(&'a C) -> Fut,
    Fut: Future<Output = Result<T, LinkwalkError>>,
{
    let mut last_error = String::from("no candidates configured");

    for candidate in candidates {
        ensure_active(token)?;

        match attempt(candidate).await {
            Ok(output) => return Ok((candidate, output)),
            Err(LinkwalkError::Cancelled) => return Err(LinkwalkError::Cancelled),
            Err(e) => {
                tracing::debug!("Candidate {} failed: {}", candidate, e);
                last_error = e.to_string();
            }
        }
    }

    Err(LinkwalkError::RoutesExhausted {
        attempts: candidates.len(),
        last_error,
    })
}
