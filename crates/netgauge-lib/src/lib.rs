//! Network diagnostics toolkit: probe cycles and transfer time estimation.
//!
//! This is a facade crate that re-exports functionality from the netgauge
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use netgauge_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = ProbeOrchestrator::new(ProbeClient::from_env()?);
//!     let report = orchestrator.run_cycle().await?;
//!     println!("download: {:.2} MB/s", report.download_mbps);
//!
//!     let estimator = TransferEstimator::new(EstimatorConfig::default());
//!     let files = [FileItem::new("backup.tar", 10.0, FileUnit::Gigabytes, "application/x-tar")];
//!     let estimate = estimator.estimate(&files);
//!     println!("upload: {}", TransferEstimator::format_seconds(estimate.upload_time_seconds));
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use netgauge_types::*;

// Re-export probe functionality
#[cfg(feature = "probe")]
pub use netgauge_probe::{
    ClientConfig, CycleReport, CycleState, DownloadProgress, DownloadSample, ProbeClient,
    ProbeError, ProbeEvent, ProbeOrchestrator, ProbeOutcome, ProbeResults, ResultSnapshot,
    UploadSample, url,
};

// Re-export estimation
#[cfg(feature = "estimate")]
pub use netgauge_estimate::{
    BandwidthSimulator, DEFAULT_TICK_INTERVAL, EstimationResult, MIN_TICK_INTERVAL,
    TransferEstimator,
    convert_from_bytes, convert_to_bytes, simulate_bandwidth,
};

/// Prelude module for convenient imports.
///
/// ```
/// use netgauge_lib::prelude::*;
/// ```
pub mod prelude {
    pub use netgauge_types::{
        CloudProvider, ConnectionType, EstimatorConfig, FileItem, FileUnit, HistoryEntry,
        HistorySeries, NetgaugeError, ProbeKey, ProbeValue, Result, TransferType,
    };

    #[cfg(feature = "probe")]
    pub use netgauge_probe::{
        ClientConfig, CycleReport, ProbeClient, ProbeError, ProbeEvent, ProbeOrchestrator,
    };

    #[cfg(feature = "estimate")]
    pub use netgauge_estimate::{BandwidthSimulator, EstimationResult, TransferEstimator};
}
