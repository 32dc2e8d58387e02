use indicatif::{ProgressBar, ProgressStyle};

/// Create a standard progress bar with consistent styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    // If total is 0 and message is empty, return a hidden bar (for quiet mode compatibility)
    if total == 0 && message.is_empty() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Create a spinner with consistent styling.
///
/// Spinners are ticked by the caller whenever there is progress to show.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

/// Create a hidden progress bar that doesn't display anything
/// Used in quiet mode to avoid flickering empty progress bars
pub fn create_hidden_progress_bar() -> ProgressBar {
    ProgressBar::hidden()
}
