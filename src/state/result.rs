//! Link check outcome definitions
//!
//! A [`LinkCheckResult`] is produced once per verification attempt and never
//! modified afterwards.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The outcome of verifying one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCheckResult {
    /// The absolute URL that was checked
    pub url: String,

    /// True iff the final response carried a success status
    pub is_working: bool,

    /// Status of the final response; absent on transport failures
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_status_code"
    )]
    pub status_code: Option<u16>,

    /// Failure reason; present exactly when the link is not working
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Page on which the link was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_page: Option<String>,
}

impl LinkCheckResult {
    /// Builds a result from a completed HTTP response status
    pub fn from_status(url: impl Into<String>, status: StatusCode, source_page: Option<&str>) -> Self {
        let is_working = status.is_success();
        let error = (!is_working).then(|| describe_status(status));

        Self {
            url: url.into(),
            is_working,
            status_code: Some(status.as_u16()),
            error,
            source_page: source_page.map(str::to_string),
        }
    }

    /// Builds a result for a request that never produced a response
    pub fn transport_failure(
        url: impl Into<String>,
        error: impl Into<String>,
        source_page: Option<&str>,
    ) -> Self {
        Self {
            url: url.into(),
            is_working: false,
            status_code: None,
            error: Some(error.into()),
            source_page: source_page.map(str::to_string),
        }
    }

    /// Human-readable status label used in reports
    pub fn status_label(&self) -> &'static str {
        if self.is_working {
            "Working"
        } else {
            "Broken"
        }
    }
}

impl fmt::Display for LinkCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status_label(), self.url)?;
        if let Some(error) = &self.error {
            write!(f, " ({})", error)?;
        }
        Ok(())
    }
}

/// Status codes arrive as numbers or numeric strings from remote checkers
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatusCode {
    Number(u16),
    Text(String),
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawStatusCode>::deserialize(deserializer)? {
        Some(RawStatusCode::Number(code)) => Some(code),
        Some(RawStatusCode::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Formats a status as `"<code> <reason>"`, e.g. `"404 Not Found"`
fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
