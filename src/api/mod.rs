//! Client for a remote link-checking endpoint
//!
//! A remote checker exposes `GET <endpoint>?url=<encoded>` and answers with
//! `{"results": [...]}` on success or `{"error": "..."}` with a 4xx/5xx status.
//! HTTP-level failures and malformed bodies are reported as different errors:
//! [`LinkwalkError::Api`] and [`LinkwalkError::Protocol`] respectively.

use crate::crawler::cancellable;
use crate::state::LinkCheckResult;
use crate::{LinkwalkError, UrlError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Timeout for one remote check request
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Builds the request URL for checking `target` through `endpoint`
pub fn remote_request_url(endpoint: &str, target: &str) -> Result<Url, LinkwalkError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| UrlError::Parse(format!("endpoint '{}': {}", endpoint, e)))?;
    url.query_pairs_mut().append_pair("url", target);
    Ok(url)
}

/// Asks a remote checker to check the links on `target`
///
/// # Returns
///
/// * `Ok(results)` - The endpoint answered 2xx with a well-formed body
/// * `Err(LinkwalkError::Api)` - The endpoint answered with an error status
/// * `Err(LinkwalkError::Protocol)` - The body was not JSON or lacked a results array
/// * `Err(LinkwalkError::Cancelled)` - The token fired
pub async fn fetch_remote_results(
    client: &Client,
    endpoint: &str,
    target: &str,
    token: &CancellationToken,
) -> Result<Vec<LinkCheckResult>, LinkwalkError> {
    let request_url = remote_request_url(endpoint, target)?;
    tracing::info!("Requesting remote check of {} from {}", target, endpoint);

    let response = cancellable(token, client.get(request_url).timeout(REMOTE_TIMEOUT).send())
        .await?
        .map_err(|source| LinkwalkError::Http {
            url: endpoint.to_string(),
            source,
        })?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = cancellable(token, response.text())
        .await?
        .map_err(|source| LinkwalkError::Http {
            url: endpoint.to_string(),
            source,
        })?;

    decode_response(status, &content_type, &body)
}

/// Interprets a remote checker response
pub fn decode_response(
    status: StatusCode,
    content_type: &str,
    body: &str,
) -> Result<Vec<LinkCheckResult>, LinkwalkError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        return Err(LinkwalkError::Api {
            status: status.as_u16(),
            message,
        });
    }

    if !is_json_content_type(content_type) {
        return Err(LinkwalkError::Protocol(format!(
            "expected application/json, got '{}'",
            content_type
        )));
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| LinkwalkError::Protocol(format!("invalid JSON: {}", e)))?;

    let results = value
        .get("results")
        .filter(|r| r.is_array())
        .ok_or_else(|| LinkwalkError::Protocol("response has no results array".to_string()))?;

    serde_json::from_value(results.clone())
        .map_err(|e| LinkwalkError::Protocol(format!("malformed result entry: {}", e)))
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
