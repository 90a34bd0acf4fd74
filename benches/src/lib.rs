//! Benchmark fixtures for netgauge.

use netgauge_lib::{
    CloudProvider, ConnectionType, EstimatorConfig, FileItem, FileUnit, TransferType,
};

/// Deterministic file selection of `count` items spread across all units.
///
/// Sizes cycle through every [`FileUnit`] so the normalization step sees a
/// realistic mix of small and large files.
pub fn sample_files(count: usize) -> Vec<FileItem> {
    let units = FileUnit::all();
    (0..count)
        .map(|i| {
            let unit = units[i % units.len()];
            let size = 1.0 + (i % 97) as f64 * 3.25;
            FileItem::new(format!("file-{i}.bin"), size, unit, FileItem::DEFAULT_MIME_TYPE)
        })
        .collect()
}

/// Named estimator configurations covering the modifier combinations.
pub fn sample_configs() -> Vec<(&'static str, EstimatorConfig)> {
    vec![
        ("default", EstimatorConfig::default()),
        (
            "compressed",
            EstimatorConfig {
                compression_enabled: true,
                compression_rate_percent: 35.0,
                ..Default::default()
            },
        ),
        (
            "all-modifiers",
            EstimatorConfig {
                compression_enabled: true,
                compression_rate_percent: 60.0,
                cloud_provider: CloudProvider::AwsS3,
                vpn_enabled: true,
                connection_type: ConnectionType::Ethernet,
                transfer_type: TransferType::P2p,
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_files_cover_every_unit() {
        let files = sample_files(10);
        assert_eq!(files.len(), 10);
        for unit in FileUnit::all() {
            assert!(files.iter().any(|f| f.size_unit() == *unit));
        }
    }

    #[test]
    fn test_sample_configs_are_valid() {
        for (name, config) in sample_configs() {
            assert!(config.validate().is_ok(), "{name}");
        }
    }
}
