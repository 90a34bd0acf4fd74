//! Estimate command implementation.
//!
//! Builds a file selection from local paths and synthetic `--file` specs,
//! layers flag overrides on top of the estimator configuration and prints
//! the predicted transfer times.

use crate::display::{print_estimate, print_json};
use anyhow::{Context, Result, bail};
use netgauge_lib::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Configuration values given on the command line.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) download: Option<f64>,
    pub(crate) upload: Option<f64>,
    pub(crate) latency: Option<f64>,
    pub(crate) compression: Option<f64>,
    pub(crate) cloud: Option<CloudProvider>,
    pub(crate) vpn: bool,
    pub(crate) connection: Option<ConnectionType>,
    pub(crate) transfer: Option<TransferType>,
}

impl Overrides {
    /// Apply every flag that was given; absent flags keep the base value.
    fn apply(&self, config: &mut EstimatorConfig) {
        if let Some(download) = self.download {
            config.download_speed_mbps = download;
        }
        if let Some(upload) = self.upload {
            config.upload_speed_mbps = upload;
        }
        if let Some(latency) = self.latency {
            config.network_latency_ms = latency;
        }
        if let Some(rate) = self.compression {
            config.compression_enabled = true;
            config.compression_rate_percent = rate;
        }
        if let Some(cloud) = self.cloud {
            config.cloud_provider = cloud;
        }
        if self.vpn {
            config.vpn_enabled = true;
        }
        if let Some(connection) = self.connection {
            config.connection_type = connection;
        }
        if let Some(transfer) = self.transfer {
            config.transfer_type = transfer;
        }
    }
}

/// Estimate transfer times for the given paths and file specs.
pub(crate) fn estimate(
    paths: &[PathBuf],
    specs: &[String],
    config_path: Option<&Path>,
    overrides: &Overrides,
    json: bool,
) -> Result<()> {
    let config = build_config(config_path, overrides)?;
    if let Err(e) = config.validate() {
        tracing::warn!("{e}; estimates may be infinite or meaningless");
    }

    let mut files = paths
        .iter()
        .map(|path| file_from_path(path))
        .collect::<Result<Vec<_>>>()?;
    for spec in specs {
        files.push(parse_file_spec(spec)?);
    }
    if files.is_empty() {
        tracing::warn!("no files selected; the estimate is the latency floor only");
    }

    let estimator = TransferEstimator::new(config);
    let result = estimator.estimate(&files);

    if json {
        print_json(&json!({
            "config": estimator.config(),
            "files": files,
            "estimate": result,
        }))?;
    } else {
        print_estimate(&estimator, &files, &result);
    }

    Ok(())
}

/// Load the base configuration (file or defaults) and apply overrides.
fn build_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<EstimatorConfig> {
    let mut config = match config_path {
        Some(path) => EstimatorConfig::from_json_file(path)
            .with_context(|| format!("Invalid estimator config: {}", path.display()))?,
        None => EstimatorConfig::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}

/// Size a local file from its metadata. The contents are never read.
fn file_from_path(path: &Path) -> Result<FileItem> {
    let metadata =
        std::fs::metadata(path).with_context(|| format!("Cannot stat {}", path.display()))?;
    if !metadata.is_file() {
        bail!("Not a regular file: {}", path.display());
    }
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(FileItem::from_bytes(name, metadata.len(), None))
}

/// Parse `NAME:SIZE:UNIT[:MIME]` into a file item.
fn parse_file_spec(spec: &str) -> Result<FileItem> {
    let parts: Vec<&str> = spec.split(':').collect();
    let (name, size, unit, mime) = match parts.as_slice() {
        [name, size, unit] => (*name, *size, *unit, None),
        [name, size, unit, mime] => (*name, *size, *unit, Some(*mime)),
        _ => bail!("Invalid file spec: {spec}. Expected NAME:SIZE:UNIT[:MIME]"),
    };

    if name.is_empty() {
        bail!("Invalid file spec: {spec}. Name is empty");
    }
    let size: f64 = size
        .parse()
        .with_context(|| format!("Invalid size in file spec: {spec}"))?;
    if !size.is_finite() || size < 0.0 {
        bail!("Invalid size in file spec: {spec}. Size must be a non-negative number");
    }
    let unit: FileUnit = unit
        .parse()
        .with_context(|| format!("Invalid unit in file spec: {spec}"))?;

    Ok(FileItem::new(
        name,
        size,
        unit,
        mime.unwrap_or(FileItem::DEFAULT_MIME_TYPE),
    ))
}
