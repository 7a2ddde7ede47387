//! Oracle-driven clamping and row pagination for `pagecarve`.
//!
//! This crate hosts the algorithms that need a measurement oracle: clamping
//! a markup fragment to a height budget with a continuation marker, and
//! packing table rows into fixed-height pages with cell-level splitting on
//! overflow. The content model and string surgery they run on live in the
//! root `pagecarve` crate.

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

mod clamp;
mod error;
mod oracle;
mod paginate;
mod truncate;

pub use pagecarve::{fission, Fragment, MarkupError, Node};

pub use clamp::{
    Clamp, PaginateLimits, PaginateOptions, TruncateOptions, A4_PAGE_HEIGHT_PX, MEASURE_SLACK_PX,
    ROW_SAFETY_MARGIN_PX,
};
pub use error::CarveError;
pub use oracle::{HeightOracle, OracleError, PageOracle};
pub use paginate::{paginate, paginate_with, pages_to_json, Cell, Page, Row};
pub use truncate::{clamp_markup, clamp_markup_with, TruncateOutcome};
