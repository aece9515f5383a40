// Renderer module - formatting utilities shared by every presenter

use chrono::{DateTime, Utc};

/// Format a [0, 1] score for display
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Format a percentage for display
pub fn format_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Format a timestamp as wall-clock time
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

pub fn format_optional_time(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map(format_time).unwrap_or_else(|| "N/A".to_string())
}

/// Scale a [0, 1] score to the integer range sparklines expect
pub fn sparkline_value(score: f64) -> u64 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formatting() {
        assert_eq!(format_score(0.375), "0.38");
        assert_eq!(format_pct(33.333), "33.3%");
        assert_eq!(
            format_time(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
            "03:04:05"
        );
        assert_eq!(format_optional_time(None), "N/A");
    }

    #[test]
    fn test_sparkline_value() {
        assert_eq!(sparkline_value(0.0), 0);
        assert_eq!(sparkline_value(0.756), 76);
        assert_eq!(sparkline_value(3.0), 100);
    }
}
