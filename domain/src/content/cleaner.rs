//! Text normalization for generated posts
//!
//! [`TextCleaner::clean`] turns raw model output into postable text: no
//! wrapping quotes, no markdown decoration, tidy whitespace, and at most
//! `max_chars` characters. It is idempotent.

use unicode_segmentation::UnicodeSegmentation;

/// Character limit of a single post on the platform
pub const POST_CHAR_LIMIT: usize = 280;

/// Appended when text had to be cut
const ELLIPSIS: char = '…';

/// Quote pairs recognised as wrapping a whole response
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('\u{201C}', '\u{201D}'),
    ('\u{2018}', '\u{2019}'),
    ('\u{00AB}', '\u{00BB}'),
];

/// Normalizes and length-bounds generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCleaner {
    max_chars: usize,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(POST_CHAR_LIMIT)
    }
}

impl TextCleaner {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Normalize then truncate, repeated until the text is stable.
    ///
    /// A cut can expose markup at the new edge (a lone `_` or quote before
    /// the ellipsis), so one pass is not enough for `clean(clean(x)) ==
    /// clean(x)`. Each pass either shrinks the text or leaves it unchanged,
    /// so the loop ends.
    pub fn clean(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        loop {
            let next = truncate_graphemes(&normalize(&current), self.max_chars);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// Whether the normalized text is longer than the limit (before cutting)
    pub fn exceeds_limit(&self, raw: &str) -> bool {
        normalize(raw).chars().count() > self.max_chars
    }
}

/// Clean with the platform limit
pub fn clean(raw: &str) -> String {
    TextCleaner::default().clean(raw)
}

/// Apply every normalization step until the text stops changing
fn normalize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let unfenced = strip_code_fences(&current);
        let plain = strip_emphasis(&unfenced);
        let collapsed = collapse_whitespace(&plain);
        let next = strip_wrapping_quotes(&collapsed).trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Drop markdown fence lines (```` ``` ```` or ```` ```lang ````) and stray fences
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .replace("```", "")
}

/// Remove wrapping quotes, repeatedly, as long as the inner text holds no
/// quote of the same kind (so `"a" and "b"` is left alone).
pub fn strip_wrapping_quotes(text: &str) -> &str {
    let mut current = text.trim();
    'outer: loop {
        for &(open, close) in QUOTE_PAIRS {
            if current.chars().count() < 2 {
                break 'outer;
            }
            if let Some(inner) = current
                .strip_prefix(open)
                .and_then(|rest| rest.strip_suffix(close))
                && !inner.contains(open)
                && !inner.contains(close)
            {
                current = inner.trim();
                continue 'outer;
            }
        }
        break;
    }
    current
}

/// Remove markdown emphasis, inline code ticks and heading markers
fn strip_emphasis(text: &str) -> String {
    let text = text.replace(['*', '`'], "").replace("__", "");
    let lines: Vec<String> = text.lines().map(strip_heading).map(strip_underscores).collect();
    lines.join("\n")
}

fn strip_heading(line: &str) -> &str {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes > 0 && trimmed[hashes..].starts_with(' ') {
        &trimmed[hashes..]
    } else {
        line
    }
}

/// Drop `_` that opens or closes a word (`_word_`), keeping inner ones
/// (`@some_user`, `snake_case`).
fn strip_underscores(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let opens = is_boundary(prev) && next.is_some_and(|n| !n.is_whitespace());
            let closes = is_boundary(next) && prev.is_some_and(|p| !p.is_whitespace());
            if opens || closes {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => {
            c.is_whitespace() || (c.is_ascii_punctuation() && !matches!(c, '_' | '@' | '#'))
        }
    }
}

/// Collapse runs of spaces/tabs, trim lines, keep at most one blank line
fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(collapsed);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Cut to `max_chars` characters without splitting a grapheme cluster.
///
/// Backs off to the last whitespace when the cut would land mid-word and the
/// whitespace sits in the final third of the kept text; otherwise cuts at the
/// grapheme boundary. The ellipsis counts toward the limit.
fn truncate_graphemes(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let budget = max_chars - 1;
    let mut kept_chars = 0;
    let mut end = 0;
    let mut last_space: Option<(usize, usize)> = None; // (byte offset, chars kept)
    let mut next_is_space = false;
    for (offset, grapheme) in text.grapheme_indices(true) {
        let width = grapheme.chars().count();
        if kept_chars + width > budget {
            next_is_space = grapheme.chars().all(char::is_whitespace);
            break;
        }
        if grapheme.chars().all(char::is_whitespace) {
            last_space = Some((offset, kept_chars));
        }
        kept_chars += width;
        end = offset + grapheme.len();
    }

    let mut cut = &text[..end];
    let mid_word = !next_is_space && !cut.ends_with(char::is_whitespace);
    if mid_word
        && let Some((offset, chars_before)) = last_space
        && chars_before * 3 >= budget * 2
    {
        cut = &text[..offset];
    }

    let mut out = cut.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_wrapping_quotes() {
        assert_eq!(clean("\"Hello world\""), "Hello world");
        assert_eq!(clean("\u{201C}Curly\u{201D}"), "Curly");
        assert_eq!(clean("'\"Nested\"'"), "Nested");
    }

    #[test]
    fn test_keeps_inner_quotes() {
        assert_eq!(clean("\"a\" and \"b\""), "\"a\" and \"b\"");
    }

    #[test]
    fn test_strips_markdown() {
        assert_eq!(clean("**Bold** and *soft* and `code`"), "Bold and soft and code");
        assert_eq!(clean("```text\nInside a fence\n```"), "Inside a fence");
        assert_eq!(clean("## Heading\nbody"), "Heading\nbody");
        assert_eq!(clean("_quiet_ words"), "quiet words");
    }

    #[test]
    fn test_keeps_handles_and_hashtags() {
        assert_eq!(clean("ping @some_user #rust_lang"), "ping @some_user #rust_lang");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean("  lots   of\t\tspace  "), "lots of space");
        assert_eq!(clean("line one\n\n\n\nline two\n\n"), "line one\n\nline two");
    }

    #[test]
    fn test_short_text_unchanged() {
        let text = "The sea remembers every name the wind forgot.";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_truncates_at_word_boundary() {
        let text = "word ".repeat(100);
        let cleaned = clean(&text);
        assert!(cleaned.chars().count() <= POST_CHAR_LIMIT);
        assert!(cleaned.ends_with("word…"));
    }

    #[test]
    fn test_truncates_long_single_word() {
        let text = "a".repeat(1000);
        let cleaned = clean(&text);
        assert_eq!(cleaned.chars().count(), POST_CHAR_LIMIT);
        assert!(cleaned.ends_with('…'));
    }

    #[test]
    fn test_truncation_keeps_graphemes_whole() {
        // family emoji: 7 chars, one grapheme
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}";
        let text = family.repeat(60);
        let cleaned = clean(&text);
        assert!(cleaned.chars().count() <= POST_CHAR_LIMIT);
        let body = cleaned.trim_end_matches('…');
        assert_eq!(body.chars().count() % 7, 0);
        assert!(body.graphemes(true).all(|g| g == family));
    }

    #[test]
    fn test_custom_limit() {
        let cleaner = TextCleaner::new(10);
        assert_eq!(cleaner.clean("one two three four"), "one two…");
        assert!(cleaner.exceeds_limit("one two three four"));
        assert!(!cleaner.exceeds_limit("\"one two\""));
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n\t "), "");
        assert_eq!(clean("\"\""), "");
    }

    #[test]
    fn test_idempotent_on_awkward_inputs() {
        let long_quoted = format!("\"{}\"", "x".repeat(400));
        let samples = [
            "\"**Hello**\"   world",
            "```\n\"quoted in fence\"\n```",
            "___x___ a_ _b",
            "\"a\" \"",
            "  ' spaced quotes '  ",
            "# not a hashtag\n#hashtag",
            "mixed\r\nline\r\n\r\n\r\nendings",
            long_quoted.as_str(),
            "emoji \u{1F44B}\u{1F3FD} wave ",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
            assert!(once.chars().count() <= POST_CHAR_LIMIT);
        }
    }

    #[test]
    fn test_idempotent_after_truncation() {
        let mut text = String::new();
        for i in 0..80 {
            text.push_str(&format!("_w{}_ \"q\" ", i));
        }
        let once = clean(&text);
        assert!(once.chars().count() <= POST_CHAR_LIMIT);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_idempotent_when_cut_exposes_lone_underscore() {
        let text = format!("{} _ tail", "a".repeat(277));
        let once = clean(&text);
        assert_eq!(clean(&once), once);
        assert!(once.chars().count() <= POST_CHAR_LIMIT);
        assert!(!once.contains('_'));
        assert!(once.ends_with('…'));
    }

    #[test]
    fn test_idempotent_on_random_markup() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let alphabet = [
            'a', 'b', ' ', ' ', '_', '"', '\'', '*', '`', '#', '\n', '\t', 'é', '\u{201C}',
            '\u{201D}', '\u{1F342}',
        ];
        let short = TextCleaner::new(24);
        let mut rng = SmallRng::seed_from_u64(280);
        for _ in 0..5_000 {
            let len = rng.gen_range(0..=400);
            let text: String = (0..len)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                .collect();

            let once = clean(&text);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", text);
            assert!(once.chars().count() <= POST_CHAR_LIMIT, "too long for {:?}", text);

            let once = short.clean(&text);
            assert_eq!(short.clean(&once), once, "not idempotent at 24 for {:?}", text);
            assert!(once.chars().count() <= 24, "too long at 24 for {:?}", text);
        }
    }
}
