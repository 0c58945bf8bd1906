//! Snapshot formatting for lint findings
//!
//! Findings are formatted consistently so that insta snapshots stay
//! readable and diff cleanly.

/// Format finding messages only (without position info).
/// Useful when you only care about the messages, not positions.
pub fn format_messages<T: AsRef<str>>(messages: &[T]) -> String {
    if messages.is_empty() {
        return String::from("(no findings)");
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("[{}] {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
