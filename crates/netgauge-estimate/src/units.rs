//! Conversion between byte counts and binary size units.

use netgauge_types::FileUnit;

/// Converts a magnitude in `unit` to bytes.
#[must_use]
pub fn convert_to_bytes(value: f64, unit: FileUnit) -> f64 {
    value * unit.multiplier()
}

/// Converts a byte count to the largest unit not exceeding it.
///
/// The value is divided by 1024 while it is at least 1024 and a larger unit
/// exists, then rounded to two decimals. Values below one byte, zero and
/// negative values stay in bytes.
#[must_use]
pub fn convert_from_bytes(bytes: f64) -> (f64, FileUnit) {
    let mut value = bytes;
    let mut unit = FileUnit::Bytes;

    while value >= 1024.0 {
        let Some(next) = unit.next_larger() else {
            break;
        };
        value /= 1024.0;
        unit = next;
    }

    (round_to_hundredths(value), unit)
}

/// Rounds to two decimal places.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
