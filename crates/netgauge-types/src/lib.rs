//! Core types for the netgauge network diagnostics toolkit.
//!
//! This crate provides the data structures shared by the estimator and the
//! probe orchestrator:
//!
//! - [`FileUnit`] - Binary size unit (bytes, KB, MB, GB, TB)
//! - [`FileItem`] - A named, sized file selected for transfer estimation
//! - [`EstimatorConfig`] - Bandwidth, latency and environment modifiers
//! - [`ProbeKey`] / [`ProbeValue`] - Result slots filled by network probes
//! - [`HistoryEntry`] / [`HistorySeries`] - Per-cycle measurement history

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod file_item;
mod history;
mod probe;
mod unit;

pub use config::{CloudProvider, ConnectionType, EstimatorConfig, TransferType, VPN_SPEED_FACTOR};
pub use error::{ConfigError, NetgaugeError, Result, VariantParseError};
pub use file_item::FileItem;
pub use history::{HistoryEntry, HistorySeries};
pub use probe::{ProbeKey, ProbeValue};
pub use unit::FileUnit;
