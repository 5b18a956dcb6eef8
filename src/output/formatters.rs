//! Reusable formatting utilities for CLI output
//!
//! Response times are stored in nanoseconds and shown in milliseconds.

/// Format a nanosecond mean as milliseconds.
///
/// Returns "N/A" when there is no mean (every sample missing).
///
/// # Example output
/// `81.23 ms`
pub fn format_ms(nanos: Option<f64>) -> String {
    match nanos {
        Some(ns) => format!("{:.2} ms", ns / 1_000_000.0),
        None => "N/A".to_string(),
    }
}

/// Format a percentage difference with an explicit sign.
///
/// # Example output
/// - `+20.00%`
/// - `-3.50%`
pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:+.2}%", p),
        None => "N/A".to_string(),
    }
}

/// Format a sample count as `recorded/total`.
pub fn format_samples(recorded: usize, total: usize) -> String {
    format!("{}/{}", recorded, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(Some(81_234_567.0)), "81.23 ms");
        assert_eq!(format_ms(Some(0.0)), "0.00 ms");
    }

    #[test]
    fn test_format_ms_missing() {
        assert_eq!(format_ms(None), "N/A");
    }

    #[test]
    fn test_format_pct_signs() {
        assert_eq!(format_pct(Some(20.0)), "+20.00%");
        assert_eq!(format_pct(Some(-3.5)), "-3.50%");
        assert_eq!(format_pct(None), "N/A");
    }

    #[test]
    fn test_format_samples() {
        assert_eq!(format_samples(9, 10), "9/10");
    }
}
