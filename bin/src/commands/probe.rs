//! Probe command implementation.
//!
//! Runs one or more probe cycles against the backend, rendering progress
//! while each cycle runs and printing the results and session history.

use crate::display::{print_history, print_json, print_results};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use netgauge_lib::prelude::*;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Run `cycles` probe cycles, pausing `interval_secs` between them.
pub(crate) async fn probe(
    base_url: &str,
    cycles: u32,
    interval_secs: u64,
    attempts: u32,
    timeout_secs: Option<u64>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        max_attempts: attempts,
        timeout: timeout_secs.map(Duration::from_secs),
        ..Default::default()
    };
    let client = ProbeClient::new(config).context("Failed to create HTTP client")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let orchestrator = ProbeOrchestrator::new(client).with_events(tx);
    let renderer = spawn_renderer(rx, quiet || json)?;

    let mut last = None;
    for cycle in 1..=cycles.max(1) {
        let report = orchestrator.run_cycle().await?;
        if !json {
            println!();
            print_results(&report.results);
        }
        last = Some(report);

        if cycle < cycles {
            tokio::select! {
                () = tokio::time::sleep(Duration::from_secs(interval_secs)) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted, stopping after {cycle} cycles");
                    break;
                }
            }
        }
    }

    let history = orchestrator.history().await;
    // Closes the event channel so the renderer exits.
    drop(orchestrator);
    renderer.await.context("Progress renderer panicked")?;

    if json {
        print_json(&json!({
            "results": last.map(|report| report.results),
            "history": history,
        }))?;
    } else {
        println!();
        print_history(&history);
    }

    Ok(())
}

/// Render cycle events on a spinner that turns into a byte bar while the
/// download runs.
fn spawn_renderer(
    mut events: mpsc::UnboundedReceiver<ProbeEvent>,
    hidden: bool,
) -> Result<JoinHandle<()>> {
    let bar = if hidden {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    let spinner = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?;
    let bytes = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
    )?
    .progress_chars("=>-");
    bar.set_style(spinner.clone());
    bar.enable_steady_tick(Duration::from_millis(120));

    Ok(tokio::spawn(async move {
        let mut sized = false;
        while let Some(event) = events.recv().await {
            match event {
                ProbeEvent::Started(key) => {
                    bar.set_message(format!("{key}: {}", key.placeholder()));
                }
                ProbeEvent::DownloadProgress(progress) => {
                    if let Some(total) = progress.total
                        && !sized
                    {
                        bar.set_style(bytes.clone());
                        bar.set_length(total);
                        sized = true;
                    }
                    bar.set_position(progress.received);
                }
                ProbeEvent::Settled(key, value) => {
                    if key == ProbeKey::Download {
                        bar.set_style(spinner.clone());
                        sized = false;
                    }
                    bar.set_message(format!("{key}: {value}"));
                }
                ProbeEvent::CycleCompleted(entry) => {
                    bar.println(format!(
                        "[{}] ping {:.0}ms, down {:.2} MB/s, up {:.2} MB/s",
                        entry.timestamp, entry.ping, entry.download, entry.upload
                    ));
                }
            }
        }
        bar.finish_and_clear();
    }))
}
