//! Backend endpoint URL construction.

use netgauge_types::ProbeKey;

/// Backend address used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "NETGAUGE_API_URL";

/// Ensures the base URL ends with a slash so endpoints resolve as children.
///
/// # Example
///
/// ```
/// use netgauge_probe::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://host/api"), "http://host/api/");
/// assert_eq!(normalize_base_url("http://host/api/"), "http://host/api/");
/// ```
#[must_use]
pub fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Builds the URL for a probe endpoint.
///
/// URL format: `{base}{endpoint}`, where `base` already ends with `/`.
///
/// # Example
///
/// ```
/// use netgauge_probe::url::endpoint_url;
/// use netgauge_types::ProbeKey;
///
/// let url = endpoint_url("http://localhost:5000/api/", ProbeKey::Ports);
/// assert_eq!(url, "http://localhost:5000/api/open-ports");
/// ```
#[must_use]
pub fn endpoint_url(base: &str, key: ProbeKey) -> String {
    format!("{}{}", base, key.endpoint())
}
