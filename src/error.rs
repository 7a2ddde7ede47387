//! Error types for markup parsing and slicing.

use core::fmt;

/// Errors produced while parsing or scanning markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupError {
    /// A `<` was never terminated by a matching `>`.
    UnterminatedTag {
        /// Byte offset of the offending `<`.
        offset: usize,
    },
    /// A closing tag arrived with no matching element open.
    UnmatchedClosing {
        /// Tag name of the closing tag.
        name: String,
        /// Byte offset where the closing tag was seen.
        offset: usize,
    },
    /// A closing tag did not match the innermost open element.
    MismatchedClosing {
        /// Tag name that was expected to close next.
        expected: String,
        /// Tag name that actually closed.
        found: String,
        /// Byte offset where the closing tag was seen.
        offset: usize,
    },
    /// An element was still open when the input ended.
    UnclosedElement {
        /// Tag name of the element left open.
        name: String,
    },
    /// The underlying markup reader rejected the input.
    Parse(String),
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedTag { offset } => {
                write!(f, "Unterminated tag at byte offset {}", offset)
            }
            Self::UnmatchedClosing { name, offset } => {
                write!(
                    f,
                    "Closing tag </{}> at byte offset {} has no open element",
                    name, offset
                )
            }
            Self::MismatchedClosing {
                expected,
                found,
                offset,
            } => {
                write!(
                    f,
                    "Closing tag </{}> at byte offset {} does not match open <{}>",
                    found, offset, expected
                )
            }
            Self::UnclosedElement { name } => {
                write!(f, "Element <{}> still open at end of input", name)
            }
            Self::Parse(msg) => write!(f, "Markup parse error: {}", msg),
        }
    }
}

impl std::error::Error for MarkupError {}
