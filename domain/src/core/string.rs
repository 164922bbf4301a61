//! String utilities for the domain layer.

/// Keep at most `max_chars` characters, appending `...` when anything was cut.
///
/// Counts Unicode scalar values, so multi-byte text is never split mid-character.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}
