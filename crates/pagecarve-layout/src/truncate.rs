//! Clamp a markup fragment to a height budget.
//!
//! The search runs in two phases per text leaf: a binary search over
//! separator segments, then a binary search over characters inside the
//! window that phase one narrowed down, with the continuation marker
//! appended to every candidate since the marker itself consumes space.
//! Oracle calls are the dominant cost, so both phases are O(log n) probes
//! per leaf; a linear scan would break the performance contract.

use serde::{Deserialize, Serialize};

use pagecarve::{fission, split_segments, trim_trailing_punctuation, Fragment, NodeKind};

use crate::clamp::{Clamp, TruncateOptions};
use crate::error::{finite, CarveError};
use crate::oracle::HeightOracle;

/// Result of one truncation call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncateOutcome {
    /// Whether any content was cut.
    pub was_truncated: bool,
    /// The markup as given.
    pub original_markup: String,
    /// Markup of the visible prefix, marker included.
    pub truncated_markup: String,
    /// Well-formed markup of everything past the cut; empty when nothing
    /// was cut.
    pub remainder_markup: String,
}

impl TruncateOutcome {
    fn untouched(markup: &str) -> Self {
        Self {
            was_truncated: false,
            original_markup: markup.to_owned(),
            truncated_markup: markup.to_owned(),
            remainder_markup: String::new(),
        }
    }
}

/// Clamp `markup` with default options.
pub fn clamp_markup(
    markup: &str,
    oracle: &mut dyn HeightOracle,
) -> Result<TruncateOutcome, CarveError> {
    clamp_markup_with(markup, &TruncateOptions::default(), oracle)
}

/// Clamp `markup` to the configured budget, producing the visible prefix and
/// the remainder.
///
/// The working tree is an exclusive, detached copy for the duration of the
/// search; the input markup is never mutated. When the content already fits,
/// the outcome is the identity (`was_truncated == false`, truncated markup
/// equal to the original). When not even the marker alone fits, the visible
/// side is empty and the whole input becomes the remainder.
pub fn clamp_markup_with(
    markup: &str,
    opts: &TruncateOptions,
    oracle: &mut dyn HeightOracle,
) -> Result<TruncateOutcome, CarveError> {
    let mut fragment = Fragment::parse(markup)?;
    if fragment.is_empty() {
        return Ok(TruncateOutcome::untouched(markup));
    }

    let line_height = finite(oracle.line_height()?, "line height")?;
    let budget = resolve_budget(opts.clamp, line_height, oracle)?;
    let full_height =
        finite(oracle.content_height(&fragment)?, "content height")? - opts.measure_slack;
    if full_height <= budget {
        return Ok(TruncateOutcome::untouched(markup));
    }

    let slack = opts.measure_slack;
    let mut measure = |candidate: &Fragment| -> Result<f32, CarveError> {
        Ok(finite(oracle.content_height(candidate)?, "content height")? - slack)
    };
    let cut = walk_fragment(&mut fragment, budget, opts, &mut measure)?;

    let marker_len = opts.marker.chars().count();
    let visible = if cut {
        fragment.text_len().saturating_sub(marker_len)
    } else {
        0
    };
    let remainder_markup = fission(markup, visible)?;
    Ok(TruncateOutcome {
        was_truncated: true,
        original_markup: markup.to_owned(),
        truncated_markup: fragment.serialize(),
        remainder_markup,
    })
}

/// Budget in pixels for the given clamp, rounded down to whole lines.
fn resolve_budget(
    clamp: Clamp,
    line_height: f32,
    oracle: &mut dyn HeightOracle,
) -> Result<f32, CarveError> {
    let lines = match clamp {
        Clamp::Lines(count) => count as f32,
        Clamp::Px(px) => lines_in(px, line_height),
        Clamp::Auto => {
            let container = finite(oracle.container_height()?, "container height")?;
            lines_in(container, line_height)
        }
    };
    Ok(lines * line_height)
}

/// Whole lines that fit in `height`.
pub(crate) fn lines_in(height: f32, line_height: f32) -> f32 {
    if line_height > 0.0 {
        (height / line_height).floor().max(0.0)
    } else {
        0.0
    }
}

struct WalkFrame {
    path: Vec<usize>,
    /// Children below this index are still unvisited.
    next: usize,
}

/// Walk `fragment` from its last child backwards, detaching whole subtrees
/// until a leaf can be cut so the tree fits `budget`.
///
/// Returns `true` as soon as one leaf cut satisfies the budget, leaving all
/// earlier content intact; `false` when every child had to be detached and
/// nothing fit. Visiting order prefers the earliest content, sacrificing
/// trailing content first. Iterative on an explicit frame stack so depth is
/// not bounded by markup nesting.
pub(crate) fn walk_fragment(
    fragment: &mut Fragment,
    budget: f32,
    opts: &TruncateOptions,
    measure: &mut dyn FnMut(&Fragment) -> Result<f32, CarveError>,
) -> Result<bool, CarveError> {
    let mut frames = vec![WalkFrame {
        next: fragment.child_count(&[]),
        path: Vec::new(),
    }];

    while let Some(mut frame) = frames.pop() {
        if frame.next == 0 {
            if frame.path.is_empty() {
                return Ok(false);
            }
            // the element is empty now and still did not help; drop the shell
            fragment.remove(&frame.path);
            continue;
        }
        frame.next -= 1;
        let mut child_path = frame.path.clone();
        child_path.push(frame.next);
        let kind = fragment.node_kind(&child_path);
        frames.push(frame);
        match kind {
            Some(NodeKind::Element) => {
                frames.push(WalkFrame {
                    next: fragment.child_count(&child_path),
                    path: child_path,
                });
            }
            Some(NodeKind::Text) => {
                match truncate_leaf(fragment, &child_path, budget, opts, measure)? {
                    LeafCut::Kept { visible } => {
                        log::trace!("leaf at {:?} cut to {} visible chars", child_path, visible);
                        return Ok(true);
                    }
                    LeafCut::Removed => {
                        fragment.remove(&child_path);
                    }
                }
            }
            None => {}
        }
    }
    Ok(false)
}

enum LeafCut {
    /// The leaf keeps a visible prefix plus the marker.
    Kept { visible: usize },
    /// Not even the marker alone fit; the leaf contributes nothing.
    Removed,
}

/// Binary-search the longest prefix of the leaf at `path` that keeps the
/// whole fragment within `budget`.
fn truncate_leaf(
    fragment: &mut Fragment,
    path: &[usize],
    budget: f32,
    opts: &TruncateOptions,
    measure: &mut dyn FnMut(&Fragment) -> Result<f32, CarveError>,
) -> Result<LeafCut, CarveError> {
    let original = match fragment.leaf_text(path) {
        Some(text) => text.to_owned(),
        None => return Ok(LeafCut::Removed),
    };

    // Phase one: segment granularity, no marker.
    let segments = split_segments(&original, &opts.split_on);
    let mut low = 0usize;
    let mut high = segments.len();
    while low < high {
        let mid = (low + high) / 2;
        fragment.set_leaf_text(path, segments[..mid].concat());
        if measure(fragment)? <= budget {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    // `low - 1` segments are known to fit; search characters one segment
    // further, where the exact cut must be.
    let window: String = segments[..low.min(segments.len())].concat();

    // Phase two: character granularity, marker appended to every candidate.
    let chars: Vec<char> = window.chars().collect();
    let mut low = 0usize;
    let mut high = chars.len();
    while low < high {
        let mid = (low + high) / 2;
        let prefix: String = chars[..mid].iter().collect();
        let candidate = format!("{}{}", trim_trailing_punctuation(&prefix), opts.marker);
        fragment.set_leaf_text(path, candidate);
        if measure(fragment)? <= budget {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    if low == 0 {
        return Ok(LeafCut::Removed);
    }

    let prefix: String = chars[..low - 1].iter().collect();
    let kept = trim_trailing_punctuation(&prefix);
    if kept.is_empty() {
        return Ok(LeafCut::Removed);
    }
    let visible = kept.chars().count();
    fragment.set_leaf_text(path, format!("{}{}", kept, opts.marker));
    if measure(fragment)? <= budget {
        Ok(LeafCut::Kept { visible })
    } else {
        Ok(LeafCut::Removed)
    }
}
