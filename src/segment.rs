//! Separator-preserving text segmentation.
//!
//! The truncation search first narrows at segment granularity before
//! switching to characters. Separators are kept as their own segments so a
//! joined prefix re-appends them exactly as authored.

/// Separator characters a text leaf splits on by default.
pub const DEFAULT_SEPARATORS: &[char] = &['.', '-', '\u{2013}', '\u{2014}', ' '];

/// Split `text` into maximal runs between separators, keeping each separator
/// as its own segment.
///
/// Joining any prefix of the result reproduces a prefix of `text`.
pub fn split_segments<'a>(text: &'a str, separators: &[char]) -> Vec<&'a str> {
    let mut segments = Vec::with_capacity(8);
    let mut run_start = 0;
    for (index, ch) in text.char_indices() {
        if separators.contains(&ch) {
            if index > run_start {
                segments.push(&text[run_start..index]);
            }
            segments.push(&text[index..index + ch.len_utf8()]);
            run_start = index + ch.len_utf8();
        }
    }
    if run_start < text.len() {
        segments.push(&text[run_start..]);
    }
    segments
}

/// Strip trailing whitespace and punctuation so a continuation marker never
/// follows a dangling separator.
pub fn trim_trailing_punctuation(text: &str) -> &str {
    text.trim_end_matches(|c: char| {
        matches!(
            c,
            ' ' | '.'
                | ','
                | ';'
                | '!'
                | '?'
                | '\''
                | '\u{2018}'
                | '\u{2019}'
                | '\u{201C}'
                | '\u{201D}'
                | '-'
                | '\u{2013}'
                | '\u{2014}'
        )
    })
}
