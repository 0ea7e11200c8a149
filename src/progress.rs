//! Progress bar and logging utilities.
//!
//! Sync runs print one line per track; routing those lines through the bar
//! keeps bar and text from clobbering each other. Log-only mode hides the
//! bars entirely for tail-friendly output (cron runs, CI).

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Set log-only mode globally
pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

/// Check if log-only mode is enabled
pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Create a progress bar with consistent styling.
/// In log-only mode, the progress bar is hidden.
pub fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})")
                .unwrap()
                .progress_chars("=> "),
        );
    }
    pb.set_message(msg.to_string());
    pb
}

/// Emit a per-item report line. A visible bar takes the line through
/// `ProgressBar::println` so it interleaves with the drawing; a hidden bar
/// (log-only mode, or stderr not a terminal) drops `println` output entirely,
/// so those fall back to plain stderr.
pub fn report_line(pb: &ProgressBar, line: impl AsRef<str>) {
    let line = line.as_ref();
    if pb.is_hidden() {
        eprintln!("{line}");
    } else {
        pb.println(line);
    }
}

/// Create a spinner for indeterminate progress (playlist creation,
/// validation). Hidden in log-only mode.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{msg} {spinner} [{elapsed_precise}]")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_only_bar_is_hidden() {
        set_log_only(true);
        let pb = create_progress_bar(10, "work");
        // Hidden bars swallow ProgressBar::println; report_line must detect
        // this and bypass the bar.
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_report_line_bypasses_hidden_bar() {
        let pb = ProgressBar::hidden();
        report_line(&pb, "WARNING: entry skipped");
        report_line(&pb, String::from("ERROR: lookup failed"));
        pb.finish_and_clear();
    }
}
