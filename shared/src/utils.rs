//! # Shared Utility Functions
//!
//! Helpers used by both the widget and the backend.

/// Trim a raw chat message.
///
/// Returns `None` for empty or whitespace-only input, which neither side treats as a message.
///
/// # Examples
///
/// ```rust
/// use shared::utils::normalize_message;
///
/// assert_eq!(normalize_message("  Need a quote \n"), Some("Need a quote".to_string()));
/// assert_eq!(normalize_message(" \t "), None);
/// ```
pub fn normalize_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
