//! Progress reporting for multi-day runs, using the indicatif crate

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the backfill progress bar
pub const DEFAULT_MAIN_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Create a progress bar over `length` days
///
/// Falls back to the indicatif default style if the template fails to parse.
#[must_use]
pub fn create_main_progress_bar(length: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(DEFAULT_MAIN_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Create a bar that draws nothing, for library callers and tests
#[must_use]
pub fn create_hidden_progress_bar(length: u64) -> ProgressBar {
    let pb = ProgressBar::hidden();
    pb.set_length(length);
    pb
}

/// Finish a progress bar with a final message
pub fn finish_progress_bar(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
