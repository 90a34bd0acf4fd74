//! HTTP probes and cycle orchestration for netgauge.
//!
//! This crate provides the measurement pipeline:
//!
//! - [`url::endpoint_url`] - Builds backend endpoint URLs
//! - [`ProbeClient`] - HTTP client with per-probe retries
//! - [`ProbeClient::measure_download`] - Streamed download with progress
//! - [`ProbeResults`] - Shared result map with placeholders
//! - [`ProbeOrchestrator`] - Runs one full probe cycle and keeps history

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod orchestrator;
mod results;
mod stream;
pub mod url;

pub use client::{
    ClientConfig, ProbeClient, ProbeError, ProbeOutcome, START_TIME_HEADER, UploadSample,
};
pub use orchestrator::{CycleReport, CycleState, ProbeEvent, ProbeOrchestrator};
pub use results::{ProbeResults, ResultSnapshot};
pub use stream::{DownloadProgress, DownloadSample, progress_percent, read_body, throughput_mbps};
