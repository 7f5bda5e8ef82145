//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a proper user agent string
//! - Verifying single links (HEAD first, GET fallback)
//! - Fetching page bodies through an access route
//! - Error classification

use crate::config::UserAgentConfig;
use crate::crawler::cancel::cancellable;
use crate::state::LinkCheckResult;
use crate::url::{with_cache_buster, AccessRoute};
use crate::LinkwalkError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Maximum redirect hops followed before a request is treated as failed
pub const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// Per-request timeouts are applied by the callers; the client itself only
/// bounds connection setup.
///
/// # Example
///
/// ```no_run
/// use linkwalk::config::UserAgentConfig;
/// use linkwalk::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Verifies that a single link resolves
///
/// # Request Flow
///
/// 1. Append a cache-busting parameter to the target and build the request URL
///    through `route`
/// 2. Send a HEAD request
/// 3. If HEAD fails without a response (timeout, connection error), send a GET
///    to the same request URL
/// 4. Redirects are followed; the final response's status decides the result
///
/// # Error Classification
///
/// | Outcome | Result |
/// |---------|--------|
/// | 2xx response | working, status set |
/// | other response | broken, status set, error `"<code> <reason>"` |
/// | timeout | broken, error `"Request timeout"` |
/// | connection failure | broken, error `"Connection failed"` |
/// | other transport error | broken, error is the transport message |
///
/// Each attempt gets its own `timeout` window. The only error returned is
/// [`LinkwalkError::Cancelled`]; every other failure becomes a broken result.
pub async fn verify_link(
    client: &Client,
    route: &AccessRoute,
    url: &str,
    source_page: Option<&str>,
    timeout: Duration,
    token: &CancellationToken,
) -> Result<LinkCheckResult, LinkwalkError> {
    let target = with_cache_buster(url, chrono::Utc::now().timestamp_millis());
    let request_url = route.request_url(&target);

    let head = cancellable(token, client.head(&request_url).timeout(timeout).send()).await?;
    let response = match head {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("HEAD {} failed ({}), retrying with GET", url, e);
            let get = cancellable(token, client.get(&request_url).timeout(timeout).send()).await?;
            match get {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("GET {} failed: {}", url, e);
                    return Ok(LinkCheckResult::transport_failure(
                        url,
                        classify_transport_error(&e),
                        source_page,
                    ));
                }
            }
        }
    };

    Ok(LinkCheckResult::from_status(
        url,
        response.status(),
        source_page,
    ))
}

/// Fetches a page body through one access route
///
/// Any failure (transport error, non-success status, unreadable body) is an
/// error so that the caller can move on to the next route.
pub async fn fetch_page(
    client: &Client,
    route: &AccessRoute,
    url: &str,
    timeout: Duration,
    token: &CancellationToken,
) -> Result<String, LinkwalkError> {
    let request_url = route.request_url(url);

    let response = cancellable(token, client.get(&request_url).timeout(timeout).send())
        .await?
        .map_err(|source| LinkwalkError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkwalkError::PageStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    cancellable(token, response.text())
        .await?
        .map_err(|source| LinkwalkError::Http {
            url: url.to_string(),
            source,
        })
}

/// Maps a transport error to the message recorded on a broken link
fn classify_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection failed".to_string()
    } else {
        error.to_string()
    }
}
