//! Cooperative cancellation helpers
//!
//! A single [`CancellationToken`] is shared by reference across a crawl. Loop
//! boundaries poll it with [`ensure_active`]; in-flight requests race against it
//! with [`cancellable`], which drops (and thereby aborts) the request future when
//! the token fires.

use crate::LinkwalkError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Returns `Err(Cancelled)` if the token has fired
pub fn ensure_active(token: &CancellationToken) -> Result<(), LinkwalkError> {
    if token.is_cancelled() {
        Err(LinkwalkError::Cancelled)
    } else {
        Ok(())
    }
}

/// Runs `fut` to completion unless the token fires first
pub async fn cancellable<F>(token: &CancellationToken, fut: F) -> Result<F::Output, LinkwalkError>
where
    F: Future,
{
    ensure_active(token)?;
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(LinkwalkError::Cancelled),
        output = fut => Ok(output),
    }
}
