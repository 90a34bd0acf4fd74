//! Binary file size units.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::VariantParseError;

/// File size unit with binary (IEC) multipliers.
///
/// Variants are ordered from smallest to largest so that `Bytes < Kilobytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum FileUnit {
    /// Single bytes.
    #[default]
    #[serde(rename = "bytes")]
    Bytes,
    /// 1024 bytes.
    #[serde(rename = "KB")]
    Kilobytes,
    /// 1024² bytes.
    #[serde(rename = "MB")]
    Megabytes,
    /// 1024³ bytes.
    #[serde(rename = "GB")]
    Gigabytes,
    /// 1024⁴ bytes.
    #[serde(rename = "TB")]
    Terabytes,
}

impl FileUnit {
    /// Returns the position of this unit in the bytes..TB ladder.
    #[must_use]
    pub const fn index(&self) -> u32 {
        match self {
            Self::Bytes => 0,
            Self::Kilobytes => 1,
            Self::Megabytes => 2,
            Self::Gigabytes => 3,
            Self::Terabytes => 4,
        }
    }

    /// Returns the number of bytes in one unit.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        1024_f64.powi(self.index() as i32)
    }

    /// Returns the next larger unit, or `None` for terabytes.
    #[must_use]
    pub const fn next_larger(&self) -> Option<Self> {
        match self {
            Self::Bytes => Some(Self::Kilobytes),
            Self::Kilobytes => Some(Self::Megabytes),
            Self::Megabytes => Some(Self::Gigabytes),
            Self::Gigabytes => Some(Self::Terabytes),
            Self::Terabytes => None,
        }
    }

    /// Returns the unit label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Kilobytes => "KB",
            Self::Megabytes => "MB",
            Self::Gigabytes => "GB",
            Self::Terabytes => "TB",
        }
    }

    /// Returns all units, smallest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bytes,
            Self::Kilobytes,
            Self::Megabytes,
            Self::Gigabytes,
            Self::Terabytes,
        ]
    }
}

impl std::fmt::Display for FileUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileUnit {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "b" | "byte" | "bytes" => Ok(Self::Bytes),
            "k" | "kb" | "kib" => Ok(Self::Kilobytes),
            "m" | "mb" | "mib" => Ok(Self::Megabytes),
            "g" | "gb" | "gib" => Ok(Self::Gigabytes),
            "t" | "tb" | "tib" => Ok(Self::Terabytes),
            _ => Err(VariantParseError::new(
                "unit",
                s,
                "bytes, KB, MB, GB, TB",
            )),
        }
    }
}
