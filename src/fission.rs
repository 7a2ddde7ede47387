//! Fission: reconstruct a well-formed remainder fragment from a character
//! offset into serialized markup.
//!
//! The scan walks the raw markup left to right, maintaining a stack of open
//! tag names. Characters are counted exactly the way [`Fragment::text_len`]
//! counts them (one per Unicode scalar value, one per resolvable entity
//! reference), so a visible-prefix length measured on the tree always lands
//! on the same cut point in the markup.
//!
//! [`Fragment::text_len`]: crate::tree::Fragment::text_len

use smallvec::SmallVec;

use crate::error::MarkupError;
use crate::tree::{is_void_tag, resolve_entity};

/// Slice the remainder of `markup` after `visible_chars` rendered characters,
/// reopening any tags still open at the cut so the result stands alone as
/// well-formed markup.
///
/// `visible_chars == 0` returns the whole markup unchanged. A remainder with
/// no text content at all collapses to the empty string, so any
/// `visible_chars` at or past the total character count yields `""`.
pub fn fission(markup: &str, visible_chars: usize) -> Result<String, MarkupError> {
    if visible_chars == 0 {
        return Ok(markup.to_owned());
    }

    let mut stack: SmallVec<[&str; 8]> = SmallVec::new();
    let mut count = 0usize;
    let mut i = 0usize;

    while i < markup.len() && count < visible_chars {
        let rest = &markup[i..];
        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => i += end + 3,
                None => return Err(MarkupError::UnterminatedTag { offset: i }),
            }
        } else if rest.starts_with('<') {
            let end = rest
                .find('>')
                .ok_or(MarkupError::UnterminatedTag { offset: i })?;
            let tag = &rest[..=end];
            if let Some(closing) = tag.strip_prefix("</") {
                let name = closing.trim_end_matches('>').trim();
                match stack.pop() {
                    Some(open) if open.eq_ignore_ascii_case(name) => {}
                    Some(open) => {
                        return Err(MarkupError::MismatchedClosing {
                            expected: open.to_owned(),
                            found: name.to_owned(),
                            offset: i,
                        });
                    }
                    None => {
                        return Err(MarkupError::UnmatchedClosing {
                            name: name.to_owned(),
                            offset: i,
                        });
                    }
                }
            } else if !tag.starts_with("<!") && !tag.starts_with("<?") {
                let name = extract_tag_name(tag);
                if !name.is_empty() && !is_void_tag(name) && !tag.ends_with("/>") {
                    stack.push(name);
                }
            }
            i += end + 1;
        } else if rest.starts_with('&') {
            // a resolvable reference renders as one character
            i += entity_len(rest).unwrap_or(1);
            count += 1;
        } else {
            match rest.chars().next() {
                Some(ch) => {
                    i += ch.len_utf8();
                    count += 1;
                }
                None => break,
            }
        }
    }

    let tail = &markup[i..];
    if !has_text_content(tail) {
        return Ok(String::new());
    }

    log::trace!(
        "fission cut at byte {} with {} tag(s) to reopen",
        i,
        stack.len()
    );
    let reopen_len: usize = stack.iter().map(|name| name.len() + 2).sum();
    let mut result = String::with_capacity(reopen_len + tail.len());
    for name in &stack {
        result.push('<');
        result.push_str(name);
        result.push('>');
    }
    result.push_str(tail);
    Ok(result)
}

/// Tag name of an opening tag slice (`"<name ...>"`).
fn extract_tag_name(tag: &str) -> &str {
    let body = &tag[1..];
    let end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    &body[..end]
}

/// Byte length of a resolvable entity reference at the head of `rest`.
fn entity_len(rest: &str) -> Option<usize> {
    let semi = rest.get(1..64.min(rest.len()))?.find(';')?;
    let body = &rest[1..semi + 1];
    if body.is_empty() {
        return None;
    }
    resolve_entity(body).map(|_| semi + 2)
}

/// Whether any rendered character (including whitespace between tags)
/// remains in the unscanned tail.
fn has_text_content(tail: &str) -> bool {
    let mut i = 0usize;
    while i < tail.len() {
        let rest = &tail[i..];
        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => i += end + 3,
                None => return false,
            }
        } else if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => i += end + 1,
                None => return false,
            }
        } else {
            return true;
        }
    }
    false
}
