//! Transfer estimator configuration and environment modifiers.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::{ConfigError, NetgaugeError, VariantParseError};

/// Cloud storage backend that an upload is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CloudProvider {
    /// No cloud hop.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Google Drive.
    #[serde(rename = "google-drive")]
    GoogleDrive,
    /// Amazon S3.
    #[serde(rename = "aws-s3")]
    AwsS3,
    /// Microsoft OneDrive.
    #[serde(rename = "onedrive")]
    OneDrive,
}

impl CloudProvider {
    /// Returns the relative upload throughput of this provider.
    #[must_use]
    pub const fn speed_factor(&self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::GoogleDrive => 0.9,
            Self::AwsS3 => 1.1,
            Self::OneDrive => 0.95,
        }
    }

    /// Returns the provider identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::GoogleDrive => "google-drive",
            Self::AwsS3 => "aws-s3",
            Self::OneDrive => "onedrive",
        }
    }

    /// Returns all providers.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::None, Self::GoogleDrive, Self::AwsS3, Self::OneDrive]
    }
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "google-drive" | "gdrive" | "google" => Ok(Self::GoogleDrive),
            "aws-s3" | "s3" | "aws" => Ok(Self::AwsS3),
            "onedrive" | "one-drive" => Ok(Self::OneDrive),
            _ => Err(VariantParseError::new(
                "cloud provider",
                s,
                "none, google-drive, aws-s3, onedrive",
            )),
        }
    }
}

/// Physical link type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Wireless link.
    #[default]
    Wifi,
    /// Wired link.
    Ethernet,
}

impl ConnectionType {
    /// Returns the speed multiplier for this link type.
    #[must_use]
    pub const fn speed_factor(&self) -> f64 {
        match self {
            Self::Wifi => 1.0,
            Self::Ethernet => 1.2,
        }
    }

    /// Returns the link type identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::Ethernet => "ethernet",
        }
    }
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wifi" | "wi-fi" | "wireless" => Ok(Self::Wifi),
            "ethernet" | "wired" | "lan" => Ok(Self::Ethernet),
            _ => Err(VariantParseError::new(
                "connection type",
                s,
                "wifi, ethernet",
            )),
        }
    }
}

/// Transfer topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    /// Direct client-server transfer.
    #[default]
    Direct,
    /// Peer-to-peer transfer.
    P2p,
}

impl TransferType {
    /// Returns the speed multiplier for this topology.
    #[must_use]
    pub const fn speed_factor(&self) -> f64 {
        match self {
            Self::Direct => 1.0,
            Self::P2p => 0.8,
        }
    }

    /// Returns the topology identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::P2p => "p2p",
        }
    }
}

impl std::fmt::Display for TransferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "p2p" | "peer" | "peer-to-peer" => Ok(Self::P2p),
            _ => Err(VariantParseError::new("transfer type", s, "direct, p2p")),
        }
    }
}

/// VPN overhead multiplier applied when a VPN is enabled.
pub const VPN_SPEED_FACTOR: f64 = 0.9;

/// Network conditions used by the transfer estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimatorConfig {
    /// Nominal download bandwidth in Mbps.
    pub download_speed_mbps: f64,
    /// Nominal upload bandwidth in Mbps.
    pub upload_speed_mbps: f64,
    /// One-off latency added to every computed time, in milliseconds.
    pub network_latency_ms: f64,
    /// Whether compression is applied before transfer.
    pub compression_enabled: bool,
    /// Percentage of bytes removed by compression (expected 0-100).
    pub compression_rate_percent: f64,
    /// Cloud backend for the cloud-upload estimate.
    pub cloud_provider: CloudProvider,
    /// Whether traffic goes through a VPN.
    pub vpn_enabled: bool,
    /// Physical link type.
    pub connection_type: ConnectionType,
    /// Transfer topology.
    pub transfer_type: TransferType,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            download_speed_mbps: 100.0,
            upload_speed_mbps: 20.0,
            network_latency_ms: 20.0,
            compression_enabled: false,
            compression_rate_percent: 50.0,
            cloud_provider: CloudProvider::None,
            vpn_enabled: false,
            connection_type: ConnectionType::Wifi,
            transfer_type: TransferType::Direct,
        }
    }
}

impl EstimatorConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, NetgaugeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, NetgaugeError> {
        let json = std::fs::read_to_string(path).map_err(|source| NetgaugeError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks the configuration for values that would produce degenerate
    /// estimates.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.compression_rate_percent) {
            return Err(ConfigError::CompressionRateOutOfRange(
                self.compression_rate_percent,
            ));
        }
        if self.download_speed_mbps <= 0.0 || self.download_speed_mbps.is_nan() {
            return Err(ConfigError::NonPositiveSpeed {
                direction: "download",
                value: self.download_speed_mbps,
            });
        }
        if self.upload_speed_mbps <= 0.0 || self.upload_speed_mbps.is_nan() {
            return Err(ConfigError::NonPositiveSpeed {
                direction: "upload",
                value: self.upload_speed_mbps,
            });
        }
        if self.network_latency_ms < 0.0 {
            return Err(ConfigError::NegativeLatency(self.network_latency_ms));
        }
        Ok(())
    }
}
