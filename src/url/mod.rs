//! URL handling module for linkwalk
//!
//! This module provides start-URL validation, host comparison, the traversal
//! exclusion list, access routes and cache-busting.

mod domain;
mod filter;
mod route;

pub use domain::{extract_domain, same_site};
pub use filter::{has_excluded_extension, EXCLUDED_EXTENSIONS};
pub use route::{AccessRoute, DEFAULT_ROUTES};

use crate::{UrlError, UrlResult};
use url::Url;

/// Name of the query parameter appended to defeat intermediate caches
pub const CACHE_BUST_PARAM: &str = "_t";

/// Parses a crawl start URL
///
/// Rejects anything that is not an absolute `http`/`https` URL with a host. This
/// runs before any network activity.
///
/// ```
/// use linkwalk::url::parse_start_url;
///
/// assert!(parse_start_url("https://site.test/").is_ok());
/// assert!(parse_start_url("site.test").is_err());
/// assert!(parse_start_url("mailto:someone@site.test").is_err());
/// ```
pub fn parse_start_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("'{}': {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if extract_domain(&url).is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Appends the cache-busting parameter to `target`
///
/// The fragment is dropped since it is never sent to the server. Targets that do
/// not parse are returned unchanged.
pub fn with_cache_buster(target: &str, stamp: i64) -> String {
    match Url::parse(target) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
            url.into()
        }
        Err(_) => target.to_string(),
    }
}
