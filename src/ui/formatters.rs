use std::time::Duration;

/// Size in kibibytes with two decimals, as shown in run summaries
pub fn format_kb(size: u64) -> String {
    format!("{:.2} KB", size as f64 / 1024.0)
}

/// Size in mebibytes with two decimals
pub fn format_mb(size: u64) -> String {
    format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2} s", elapsed.as_secs_f64())
}
