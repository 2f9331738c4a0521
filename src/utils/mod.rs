//! Common utilities and helpers

pub mod path;
pub mod time;

/// Utility functions for VidMeta
pub struct Utils;

impl Utils {
    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Format a bitrate in bits per second for display
    pub fn format_bitrate(bits_per_second: u64) -> String {
        match bits_per_second {
            0 => "unknown".to_string(),
            b if b >= 1_000_000 => format!("{:.2} Mbit/s", b as f64 / 1_000_000.0),
            b if b >= 1_000 => format!("{:.1} kbit/s", b as f64 / 1_000.0),
            b => format!("{} bit/s", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(Utils::format_file_size(512), "512 B");
        assert_eq!(Utils::format_file_size(1536), "1.50 KB");
        assert_eq!(Utils::format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_bitrate() {
        assert_eq!(Utils::format_bitrate(0), "unknown");
        assert_eq!(Utils::format_bitrate(900), "900 bit/s");
        assert_eq!(Utils::format_bitrate(128_000), "128.0 kbit/s");
        assert_eq!(Utils::format_bitrate(4_500_000), "4.50 Mbit/s");
    }
}
