//! Time formatting for log and display output.

/// Format seconds as `H:MM:SS`, rounded to the nearest second.
pub fn format_seconds(total_secs: f64) -> String {
    let total = total_secs.round().max(0.0) as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    format!("{}:{:02}:{:02}", hours, mins, secs)
}
