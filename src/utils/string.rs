//! String utility functions for link and YAML text processing

/// Quote a value as a single-quoted YAML scalar.
///
/// Embedded single quotes are doubled; nothing else is escaped.
///
/// # Arguments
///
/// * `s` - The raw value
///
/// # Returns
///
/// The value wrapped in single quotes
pub fn yaml_single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Loose boolean flag as share links spell it.
///
/// True when the value, lowercased, contains `true` or `1`.
pub fn is_truthy_flag(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.contains("true") || lower.contains('1')
}

/// Parse the leading decimal digits of a string.
///
/// Leading whitespace is skipped and anything after the digits is ignored,
/// so `"8388/?plugin=..."` yields `8388`.
///
/// # Returns
///
/// `None` if the string does not start with a digit or the number overflows
pub fn parse_leading_int(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}

/// Map an empty string to `None`.
pub fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
