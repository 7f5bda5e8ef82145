//! Result export in CSV and JSON form

use crate::crawler::CrawlReport;
use crate::state::LinkCheckResult;
use crate::LinkwalkError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column headers of the CSV export
pub const CSV_HEADERS: [&str; 4] = ["URL", "Status", "Status Code", "Error"];

/// Writes results as CSV with standard quoting (internal quotes doubled)
///
/// # Example
///
/// ```
/// use linkwalk::output::write_csv;
/// use linkwalk::LinkCheckResult;
///
/// let results = vec![LinkCheckResult::transport_failure(
///     "https://site.test/",
///     "Request timeout",
///     None,
/// )];
/// let mut buffer = Vec::new();
/// write_csv(&results, &mut buffer).unwrap();
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.ends_with("https://site.test/,Broken,,Request timeout\n"));
/// ```
pub fn write_csv<W: Write>(results: &[LinkCheckResult], writer: W) -> Result<(), LinkwalkError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for result in results {
        let status_code = result
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_default();
        csv_writer.write_record([
            result.url.as_str(),
            result.status_label(),
            status_code.as_str(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes results as CSV to a file, replacing any existing content
pub fn export_csv(results: &[LinkCheckResult], path: &Path) -> Result<(), LinkwalkError> {
    let file = File::create(path)?;
    write_csv(results, file)?;
    tracing::info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}

/// Writes the full report as pretty-printed JSON
pub fn write_json<W: Write>(report: &CrawlReport, mut writer: W) -> Result<(), LinkwalkError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}
