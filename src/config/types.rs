use serde::Deserialize;

/// Main configuration structure for linkwalk
///
/// Every section and field has a default, so an empty file (or no file at all)
/// yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub checker: CheckerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub access: AccessConfig,
}

/// How pages are crawled and links verified
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Depth limit used when the caller does not supply one
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of links verified concurrently in one window
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Maximum links checked on a page in single-page mode
    #[serde(rename = "page-link-limit")]
    pub page_link_limit: usize,

    /// Timeout for each HEAD or GET verification attempt (milliseconds)
    #[serde(rename = "link-timeout-ms")]
    pub link_timeout_ms: u64,

    /// Timeout for each page fetch attempt through a route (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Which link extractor to use
    pub extractor: ExtractMode,

    /// Extensions excluded from traversal in addition to the built-in list
    #[serde(rename = "extra-excluded-extensions")]
    pub extra_excluded_extensions: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            batch_size: 3,
            page_link_limit: 25,
            link_timeout_ms: 8_000,
            page_timeout_ms: 10_000,
            extractor: ExtractMode::Html,
            extra_excluded_extensions: Vec::new(),
        }
    }
}

/// Link extraction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Structural parse of the document tree
    #[default]
    Html,
    /// Attribute pattern matching over the raw markup
    Pattern,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    pub name: String,

    /// Version sent in the User-Agent header
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Ordered access routes tried for page fetches
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// `"direct"` or a prefix template the percent-encoded target is appended to
    pub routes: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            routes: crate::url::DEFAULT_ROUTES
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}
