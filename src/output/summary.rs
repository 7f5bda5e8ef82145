//! Summary statistics for a finished (or cancelled) check

use crate::crawler::PageError;
use crate::state::LinkCheckResult;
use std::collections::{BTreeMap, HashSet};

/// Aggregate counts over a set of link results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckSummary {
    /// Total link checks (a URL found on several pages counts once per page)
    pub total_links: usize,

    /// Distinct URLs checked
    pub unique_urls: usize,

    pub working: usize,
    pub broken: usize,

    /// Pages fetched and processed
    pub pages_checked: usize,

    /// Broken links grouped by error message
    pub broken_by_reason: BTreeMap<String, usize>,

    /// Pages that could not be fetched
    pub page_errors: Vec<PageError>,

    /// True when the run stopped early on cancellation
    pub cancelled: bool,
}

impl CheckSummary {
    /// Computes a summary from results and page bookkeeping
    pub fn from_results(
        results: &[LinkCheckResult],
        pages_checked: usize,
        page_errors: &[PageError],
    ) -> Self {
        let unique_urls = results
            .iter()
            .map(|r| r.url.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut broken_by_reason = BTreeMap::new();
        for result in results.iter().filter(|r| !r.is_working) {
            let reason = result.error.clone().unwrap_or_else(|| "Unknown".to_string());
            *broken_by_reason.entry(reason).or_insert(0) += 1;
        }

        let working = results.iter().filter(|r| r.is_working).count();

        Self {
            total_links: results.len(),
            unique_urls,
            working,
            broken: results.len() - working,
            pages_checked,
            broken_by_reason,
            page_errors: page_errors.to_vec(),
            cancelled: false,
        }
    }

    /// Marks the summary as covering a cancelled run
    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Percentage of checks that found a working link
    pub fn success_rate(&self) -> f64 {
        if self.total_links == 0 {
            return 0.0;
        }
        (self.working as f64 / self.total_links as f64) * 100.0
    }
}

/// Renders a summary as a human-readable block of text
pub fn render_summary(summary: &CheckSummary) -> String {
    let mut out = String::new();

    if summary.cancelled {
        out.push_str("=== Link Check Cancelled (partial results) ===\n\n");
    } else {
        out.push_str("=== Link Check Summary ===\n\n");
    }

    out.push_str("Overview:\n");
    out.push_str(&format!("  Pages checked: {}\n", summary.pages_checked));
    out.push_str(&format!(
        "  Links checked: {} ({} unique)\n",
        summary.total_links, summary.unique_urls
    ));
    out.push_str(&format!("  Working: {}\n", summary.working));
    out.push_str(&format!("  Broken: {}\n\n", summary.broken));

    if !summary.broken_by_reason.is_empty() {
        out.push_str("Broken Links by Reason:\n");
        let mut reasons: Vec<_> = summary.broken_by_reason.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (reason, count) in reasons {
            out.push_str(&format!("  {}: {}\n", reason, count));
        }
        out.push('\n');
    }

    if !summary.page_errors.is_empty() {
        out.push_str(&format!(
            "Pages That Could Not Be Fetched ({}):\n",
            summary.page_errors.len()
        ));
        for error in &summary.page_errors {
            out.push_str(&format!("  - {}: {}\n", error.url, error.message));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} links working)\n",
        summary.success_rate(),
        summary.working,
        summary.total_links
    ));

    out
}

/// Prints a summary to stdout
pub fn print_summary(summary: &CheckSummary) {
    print!("{}", render_summary(summary));
}
