//! File selections fed to the transfer estimator.

use serde::{Deserialize, Serialize};

use crate::FileUnit;

/// Default MIME type for items whose type is unknown.
const OCTET_STREAM: &str = "application/octet-stream";

/// A named, sized file.
///
/// Items are immutable; a new selection replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    name: String,
    size_value: f64,
    size_unit: FileUnit,
    #[serde(default = "default_mime")]
    mime_type: String,
}

fn default_mime() -> String {
    OCTET_STREAM.to_string()
}

impl FileItem {
    /// MIME type assumed when none is given.
    pub const DEFAULT_MIME_TYPE: &'static str = OCTET_STREAM;

    /// Creates a new file item.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        size_value: f64,
        size_unit: FileUnit,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size_value,
            size_unit,
            mime_type: mime_type.into(),
        }
    }

    /// Creates a file item from a raw byte count.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, bytes: u64, mime_type: Option<&str>) -> Self {
        Self::new(
            name,
            bytes as f64,
            FileUnit::Bytes,
            mime_type.unwrap_or(OCTET_STREAM),
        )
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size magnitude in [`Self::size_unit`].
    #[must_use]
    pub const fn size_value(&self) -> f64 {
        self.size_value
    }

    /// Returns the unit of [`Self::size_value`].
    #[must_use]
    pub const fn size_unit(&self) -> FileUnit {
        self.size_unit
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the size in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> f64 {
        self.size_value * self.size_unit.multiplier()
    }
}
