//! String helpers for log lines and embedded excerpts.

/// Truncate to at most `max_len` bytes, marking the cut with `...`.
///
/// Never splits a UTF-8 character. Used for excerpts embedded in
/// meta-prompts, not for post text (see [`crate::content::cleaner`]).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let end = floor_char_boundary(s, max_len.saturating_sub(3));
        format!("{}...", &s[..end])
    }
}

/// Sub-slice of at most `max_bytes` for log previews; no marker appended.
pub fn preview(s: &str, max_bytes: usize) -> &str {
    &s[..floor_char_boundary(s, max_bytes)]
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut end = index;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
