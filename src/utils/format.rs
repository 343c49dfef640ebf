//! Human-readable sizes and durations

/// Format a byte count with a binary unit, e.g. `1.50 KB`
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

/// Format a millisecond duration as a human-readable string
pub fn format_elapsed_ms(ms: f64) -> String {
    if !ms.is_finite() || ms < 0.0 {
        return "-".to_string();
    }
    if ms < 1000.0 {
        format!("{:.3}ms", ms)
    } else if ms < 60_000.0 {
        format!("{:.3}s", ms / 1000.0)
    } else {
        let seconds = (ms / 1000.0) as u64;
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(512), "512.00 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 * 1024), "3.00 TB");
    }

    #[test]
    fn test_format_elapsed_ms() {
        assert_eq!(format_elapsed_ms(12.3456), "12.346ms");
        assert_eq!(format_elapsed_ms(1500.0), "1.500s");
        assert_eq!(format_elapsed_ms(65_000.0), "1m 5s");
        assert_eq!(format_elapsed_ms(f64::NAN), "-");
    }
}
