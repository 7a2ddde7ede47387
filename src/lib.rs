//! Markup-preserving truncation primitives.
//!
//! This crate owns the content/markup domain of the pagecarve workspace:
//! the [`tree`] content model with fragment parse/serialize, the
//! separator-preserving [`segment`] splitter, and [`fission`], the scan
//! that rebuilds a well-formed remainder fragment from a character offset.
//! The oracle-driven clamping and pagination algorithms that consume these
//! primitives live in the `pagecarve-layout` crate.

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod error;
pub mod fission;
pub mod segment;
pub mod tree;

pub use error::MarkupError;
pub use fission::fission;
pub use segment::{split_segments, trim_trailing_punctuation, DEFAULT_SEPARATORS};
pub use tree::{is_void_tag, Element, Fragment, Node, NodeKind, VOID_TAGS};
