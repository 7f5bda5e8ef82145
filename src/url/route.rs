use crate::ConfigError;
use std::fmt;
use url::form_urlencoded;
use url::Url;

/// Route list used when the configuration does not name one
///
/// A direct request is tried first; the public prefixes are fallbacks for
/// targets that refuse or block direct access.
pub const DEFAULT_ROUTES: &[&str] = &[
    "direct",
    "https://api.allorigins.win/raw?url=",
    "https://corsproxy.io/?url=",
    "https://api.codetabs.com/v1/proxy?quest=",
];

/// An access intermediary a request is sent through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRoute {
    /// Request the target URL itself
    Direct,
    /// Request `prefix + percent-encoded target`
    Prefix(String),
}

impl AccessRoute {
    /// Parses a configured route
    ///
    /// `"direct"` (case-insensitive) selects [`AccessRoute::Direct`]; anything else
    /// must be an `http`/`https` URL prefix.
    pub fn parse(route: &str) -> Result<Self, ConfigError> {
        let route = route.trim();
        if route.eq_ignore_ascii_case("direct") {
            return Ok(Self::Direct);
        }

        let parsed = Url::parse(route)
            .map_err(|e| ConfigError::InvalidRoute(format!("'{}': {}", route, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidRoute(format!(
                "'{}': only http and https prefixes are supported",
                route
            )));
        }

        Ok(Self::Prefix(route.to_string()))
    }

    /// Parses every configured route, preserving order
    pub fn parse_all(routes: &[String]) -> Result<Vec<Self>, ConfigError> {
        routes.iter().map(|r| Self::parse(r)).collect()
    }

    /// Builds the URL actually requested for `target`
    ///
    /// ```
    /// use linkwalk::url::AccessRoute;
    ///
    /// let route = AccessRoute::Prefix("https://proxy.test/raw?url=".to_string());
    /// assert_eq!(
    ///     route.request_url("https://site.test/a?b=1"),
    ///     "https://proxy.test/raw?url=https%3A%2F%2Fsite.test%2Fa%3Fb%3D1"
    /// );
    /// assert_eq!(AccessRoute::Direct.request_url("https://site.test/"), "https://site.test/");
    /// ```
    pub fn request_url(&self, target: &str) -> String {
        match self {
            Self::Direct => target.to_string(),
            Self::Prefix(prefix) => {
                let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
                format!("{}{}", prefix, encoded)
            }
        }
    }
}

impl fmt::Display for AccessRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Prefix(prefix) => write!(f, "{}", prefix),
        }
    }
}
