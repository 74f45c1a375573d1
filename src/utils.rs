//! Helpers shared by the command orchestrators and the listing formatter.

use crate::constants::PROGRESS_SPINNER_TEMPLATE;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a progress spinner with consistent styling
///
/// # Arguments
/// * `message` - Initial message to display
///
/// # Returns
/// * Configured `ProgressBar` instance; hidden when stderr is not a terminal
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Format a byte count in base-1024 units
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * `"900 B"` below 1024, otherwise one decimal and a `KB`..`EB` unit (e.g. `"1.5 KB"`)
pub fn format_bytes(bytes: i64) -> String {
    const UNIT: i64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT && exp < PREFIXES.len() - 1 {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Size of `new_size` as a percentage of `original_size`
pub fn percent_of_original(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    new_size as f64 / original_size as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(900), "900 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(format_bytes(5 * 1024_i64.pow(4)), "5.0 TB");
        assert_eq!(format_bytes(i64::MAX), "8.0 EB");
    }

    #[test]
    fn test_percent_of_original() {
        assert_eq!(percent_of_original(1000, 800), 80.0);
        assert_eq!(percent_of_original(1000, 1200), 120.0);
        assert_eq!(percent_of_original(0, 500), 0.0);
    }
}
