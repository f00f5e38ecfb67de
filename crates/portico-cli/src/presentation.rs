//! Terminal output helpers for the routes commands.
//!
//! Format-only: no domain transforms belong here.

/// Truncate a value for a fixed-width table column, marking the cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Horizontal rule between the header and the rows.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Table marker for the enabled flag.
pub const fn enabled_marker(enabled: bool) -> &'static str {
    if enabled { "yes" } else { "no" }
}
