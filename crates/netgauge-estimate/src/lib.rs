//! Transfer time estimation for the netgauge network diagnostics toolkit.
//!
//! This crate turns a file selection and a set of network conditions into
//! predicted transfer durations:
//!
//! - [`TransferEstimator`] - Computes download, upload and cloud-upload times
//! - [`EstimationResult`] - Estimated durations plus sizing diagnostics
//! - [`convert_to_bytes`] / [`convert_from_bytes`] - Binary unit conversion
//! - [`BandwidthSimulator`] - Cosmetic "current bandwidth" ticker for displays

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod estimator;
mod simulator;
mod units;

pub use estimator::{EstimationResult, TransferEstimator};
pub use simulator::{
    BandwidthSimulator, DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL, simulate_bandwidth,
};
pub use units::{convert_from_bytes, convert_to_bytes, round_to_hundredths};
