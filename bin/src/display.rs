//! Display utilities and output formatting for the netgauge CLI.

use anyhow::Result;
use netgauge_lib::prelude::*;
use netgauge_lib::{EstimationResult, ResultSnapshot};
use serde::Serialize;

const RULE_WIDTH: usize = 60;

/// Print any serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the probe result map as a two-column table.
pub(crate) fn print_results(results: &ResultSnapshot) {
    println!("{:<10} {}", "PROBE", "RESULT");
    println!("{}", "-".repeat(RULE_WIDTH));
    for (key, value) in results {
        println!("{:<10} {}", key.as_str(), value);
    }
}

/// Print the session history with per-column averages.
pub(crate) fn print_history(history: &HistorySeries) {
    println!(
        "{:<10} {:>12} {:>14} {:>14}",
        "TIME", "PING (ms)", "DOWN (MB/s)", "UP (MB/s)"
    );
    println!("{}", "-".repeat(RULE_WIDTH));
    for entry in history {
        println!(
            "{:<10} {:>12.0} {:>14.2} {:>14.2}",
            entry.timestamp, entry.ping, entry.download, entry.upload
        );
    }

    if let (Some(ping), Some(download), Some(upload)) = (
        history.average_ping(),
        history.average_download(),
        history.average_upload(),
    ) {
        println!("{}", "-".repeat(RULE_WIDTH));
        println!(
            "{:<10} {:>12.0} {:>14.2} {:>14.2}",
            "AVERAGE", ping, download, upload
        );
    }
}

/// Print the selected files and the estimate summary.
pub(crate) fn print_estimate(
    estimator: &TransferEstimator,
    files: &[FileItem],
    result: &EstimationResult,
) {
    println!("{:<30} {:>14} {:<24}", "FILE", "SIZE", "TYPE");
    println!("{}", "-".repeat(RULE_WIDTH + 10));
    for file in files {
        println!(
            "{:<30} {:>14} {:<24}",
            file.name(),
            TransferEstimator::format_bytes(file.size_in_bytes()),
            file.mime_type()
        );
    }
    println!();
    println!("{}", estimator.format_estimate(result));
}
