//! Transfer time estimation logic.

use netgauge_types::{EstimatorConfig, FileItem, FileUnit, VPN_SPEED_FACTOR};
use serde::Serialize;

use crate::units::{convert_from_bytes, convert_to_bytes};

/// Bits per second in one Mbps, as used by the time formula (binary mega).
const BITS_PER_MBIT: f64 = 1024.0 * 1024.0;

/// Estimated transfer durations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    /// Predicted download time in seconds.
    pub download_time_seconds: f64,
    /// Predicted upload time in seconds.
    pub upload_time_seconds: f64,
    /// Predicted upload time to the configured cloud provider in seconds.
    pub cloud_upload_time_seconds: f64,
    /// Sum of all file sizes in bytes.
    pub total_bytes: f64,
    /// Bytes left after compression.
    pub transferred_bytes: f64,
    /// Transferred size normalized to [`Self::final_unit`].
    pub final_size: f64,
    /// Unit of [`Self::final_size`].
    pub final_unit: FileUnit,
}

/// File transfer time estimator.
///
/// Estimation is pure: the same files and configuration always produce the
/// same result. Inputs are not validated; a non-positive speed yields an
/// infinite or NaN time. Use [`EstimatorConfig::validate`] to check first.
#[derive(Debug, Clone, Default)]
pub struct TransferEstimator {
    config: EstimatorConfig,
}

impl TransferEstimator {
    /// Creates a new estimator for the given network conditions.
    #[must_use]
    pub const fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Returns the network conditions.
    #[must_use]
    pub const fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimates transfer times for a file selection.
    #[must_use]
    pub fn estimate(&self, files: &[FileItem]) -> EstimationResult {
        let total_bytes = Self::total_bytes(files);
        let transferred_bytes = self.transferred_bytes(total_bytes);

        // The time formula runs on the unit-normalized magnitude, not on bytes.
        let (final_size, final_unit) = convert_from_bytes(transferred_bytes);
        let latency_ms = self.config.network_latency_ms;

        let result = EstimationResult {
            download_time_seconds: Self::transfer_time(
                final_size,
                self.effective_download_speed(),
                latency_ms,
            ),
            upload_time_seconds: Self::transfer_time(
                final_size,
                self.effective_upload_speed(),
                latency_ms,
            ),
            cloud_upload_time_seconds: Self::transfer_time(
                final_size,
                self.cloud_upload_speed(),
                latency_ms,
            ),
            total_bytes,
            transferred_bytes,
            final_size,
            final_unit,
        };

        tracing::trace!(
            files = files.len(),
            total_bytes,
            final_size,
            %final_unit,
            download_s = result.download_time_seconds,
            upload_s = result.upload_time_seconds,
            "computed transfer estimate"
        );

        result
    }

    /// Sums the sizes of all files in bytes.
    #[must_use]
    pub fn total_bytes(files: &[FileItem]) -> f64 {
        files
            .iter()
            .map(|file| convert_to_bytes(file.size_value(), file.size_unit()))
            .sum()
    }

    /// Applies compression, if enabled, to a byte count.
    #[must_use]
    pub fn transferred_bytes(&self, total_bytes: f64) -> f64 {
        if self.config.compression_enabled {
            total_bytes * (1.0 - self.config.compression_rate_percent / 100.0)
        } else {
            total_bytes
        }
    }

    /// Download speed after VPN, connection and transfer modifiers.
    #[must_use]
    pub fn effective_download_speed(&self) -> f64 {
        self.apply_modifiers(self.config.download_speed_mbps)
    }

    /// Upload speed after VPN, connection and transfer modifiers.
    #[must_use]
    pub fn effective_upload_speed(&self) -> f64 {
        self.apply_modifiers(self.config.upload_speed_mbps)
    }

    /// Upload speed towards the cloud provider.
    ///
    /// Starts from the nominal upload speed; environment modifiers do not
    /// apply on this path.
    #[must_use]
    pub fn cloud_upload_speed(&self) -> f64 {
        self.config.upload_speed_mbps * self.config.cloud_provider.speed_factor()
    }

    fn apply_modifiers(&self, base_mbps: f64) -> f64 {
        let mut speed = base_mbps;
        if self.config.vpn_enabled {
            speed *= VPN_SPEED_FACTOR;
        }
        speed *= self.config.connection_type.speed_factor();
        speed *= self.config.transfer_type.speed_factor();
        speed
    }

    /// Computes `size * 8 / (speed * 1024²)` seconds plus the latency.
    #[must_use]
    pub fn transfer_time(size: f64, speed_mbps: f64, latency_ms: f64) -> f64 {
        let base_time = (size * 8.0) / (speed_mbps * BITS_PER_MBIT);
        base_time + latency_ms / 1000.0
    }

    /// Formats an estimate as a human-readable summary.
    #[must_use]
    pub fn format_estimate(&self, result: &EstimationResult) -> String {
        format!(
            "Size: {} ({} {} after compression)\n\
             Download: {} at {:.2} Mbps\n\
             Upload: {} at {:.2} Mbps\n\
             Cloud upload ({}): {} at {:.2} Mbps",
            Self::format_bytes(result.total_bytes),
            result.final_size,
            result.final_unit,
            Self::format_seconds(result.download_time_seconds),
            self.effective_download_speed(),
            Self::format_seconds(result.upload_time_seconds),
            self.effective_upload_speed(),
            self.config.cloud_provider,
            Self::format_seconds(result.cloud_upload_time_seconds),
            self.cloud_upload_speed(),
        )
    }

    /// Formats bytes in human-readable form (e.g., "1.50 GB", "250 B").
    #[must_use]
    pub fn format_bytes(bytes: f64) -> String {
        let (value, unit) = convert_from_bytes(bytes);
        match unit {
            FileUnit::Bytes => format!("{value} B"),
            _ => format!("{value:.2} {unit}"),
        }
    }

    /// Formats seconds in human-readable form (e.g., "2h 30m", "1m 5s", "12.50ms").
    #[must_use]
    pub fn format_seconds(seconds: f64) -> String {
        if !seconds.is_finite() || seconds < 0.0 {
            return "unbounded".to_string();
        }
        if seconds < 1.0 {
            return format!("{:.2}ms", seconds * 1000.0);
        }

        let total_secs = seconds.round() as u64;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let secs = total_secs % 60;

        if hours > 0 {
            if minutes > 0 {
                format!("{hours}h {minutes}m")
            } else {
                format!("{hours}h")
            }
        } else if minutes > 0 {
            if secs > 0 && minutes < 10 {
                format!("{minutes}m {secs}s")
            } else {
                format!("{minutes}m")
            }
        } else {
            format!("{secs}s")
        }
    }
}
