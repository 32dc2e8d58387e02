//! Output formatting utilities

use std::fmt::Display;
use std::time::Duration;

/// Format a number with thousands separators
pub fn format_number<T: Display>(n: T) -> String {
    let s = n.to_string();

    // Handle negative numbers
    let (is_negative, digits) = if let Some(stripped) = s.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, s.as_str())
    };

    let mut result = String::new();

    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if is_negative {
        result.push('-');
    }

    result.chars().rev().collect()
}

/// Compact elapsed-time display: `850ms`, `12s`, `3m 05s`, `1h 02m`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}
