/// Format a percentage for display; whole numbers drop the fraction.
/// Values stay unrounded everywhere else — rounding happens only here.
pub fn format_percent(rate: f64) -> String {
    if (rate - rate.round()).abs() < 0.05 {
        format!("{:.0}%", rate)
    } else {
        format!("{:.1}%", rate)
    }
}

/// Format a logged numeric value, trimming trailing zeros.
pub fn format_value(value: f64) -> String {
    if value == value.floor() {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Create a simple ASCII progress bar.
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Progress bar driven by a percentage in [0, 100].
pub fn percent_bar(rate: f64, width: usize) -> String {
    let ratio = (rate / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(25.0), "25%");
        assert_eq!(format_percent(33.333333), "33.3%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn value_formatting_trims_zeros() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(2.5), "2.5");
    }

    #[test]
    fn bars_clamp_to_width() {
        assert_eq!(progress_bar(0, 0, 4), "░░░░");
        assert_eq!(progress_bar(10, 5, 4), "████");
        assert_eq!(percent_bar(50.0, 4).chars().count(), 4);
    }
}
