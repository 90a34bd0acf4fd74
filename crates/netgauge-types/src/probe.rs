//! Probe result slots and values.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::VariantParseError;

/// Result slot owned by exactly one network probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKey {
    /// Public IP address.
    Ip,
    /// Round-trip latency.
    Ping,
    /// Download throughput.
    Download,
    /// Upload throughput.
    Upload,
    /// Remote nmap summary.
    Nmap,
    /// Remote open-port listing.
    Ports,
    /// Remote service detection.
    Services,
    /// Remote vulnerability scan.
    Vuln,
    /// Remote TLS certificate check.
    Ssl,
    /// Remote firewall check.
    Firewall,
}

impl ProbeKey {
    /// Returns the result key name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Ping => "ping",
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Nmap => "nmap",
            Self::Ports => "ports",
            Self::Services => "services",
            Self::Vuln => "vuln",
            Self::Ssl => "ssl",
            Self::Firewall => "firewall",
        }
    }

    /// Returns the backend endpoint path, relative to the base URL.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Ping => "ping",
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Nmap => "nmap",
            Self::Ports => "open-ports",
            Self::Services => "services",
            Self::Vuln => "vuln-scan",
            Self::Ssl => "ssl-check",
            Self::Firewall => "firewall-check",
        }
    }

    /// Returns the text shown before the probe settles.
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Ip | Self::Ping => "Fetching...",
            Self::Download | Self::Upload => "Testing...",
            Self::Nmap | Self::Ports | Self::Services | Self::Vuln | Self::Ssl | Self::Firewall => {
                "Scanning..."
            }
        }
    }

    /// Returns all keys in cycle order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Ip,
            Self::Ping,
            Self::Download,
            Self::Upload,
            Self::Nmap,
            Self::Ports,
            Self::Services,
            Self::Vuln,
            Self::Ssl,
            Self::Firewall,
        ]
    }

    /// Returns the remote scan keys issued as one concurrent batch.
    #[must_use]
    pub const fn scans() -> &'static [Self] {
        &[
            Self::Nmap,
            Self::Ports,
            Self::Services,
            Self::Vuln,
            Self::Ssl,
            Self::Firewall,
        ]
    }
}

impl std::fmt::Display for ProbeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProbeKey {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|key| key.as_str() == s || key.endpoint() == s)
            .copied()
            .ok_or_else(|| {
                VariantParseError::new(
                    "probe key",
                    s,
                    "ip, ping, download, upload, nmap, ports, services, vuln, ssl, firewall",
                )
            })
    }
}

/// Value stored in a probe result slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeValue {
    /// Numeric value reported by the backend.
    Number(f64),
    /// Text value, placeholder or formatted failure.
    Text(String),
}

impl ProbeValue {
    /// Converts a JSON value, keeping strings and numbers as-is and
    /// rendering anything else as compact JSON text.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            other => Self::Text(other.to_string()),
        }
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Returns the numeric reading of this value.
    ///
    /// Text values are read by their leading numeric prefix, so `"42ms"`
    /// yields `42.0`. Returns `None` when no prefix parses.
    #[must_use]
    pub fn leading_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => {
                let trimmed = s.trim_start();
                let end = trimmed
                    .char_indices()
                    .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
                    .map_or(trimmed.len(), |(i, _)| i);
                trimmed[..end].parse().ok()
            }
        }
    }
}

impl std::fmt::Display for ProbeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for ProbeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ProbeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for ProbeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}
