//! Error types for clamping and pagination.

use core::fmt;

use pagecarve::MarkupError;

use crate::oracle::OracleError;

/// Errors surfaced by truncation and pagination calls.
///
/// Failures are synchronous and final: nothing is retried internally and no
/// partial result is returned alongside an error.
#[derive(Clone, Debug, PartialEq)]
pub enum CarveError {
    /// No printable content was provided.
    NoContent,
    /// The markup could not be parsed or sliced.
    Markup(MarkupError),
    /// The measurement oracle failed or produced a non-finite value.
    Oracle(String),
    /// Pagination exceeded the configured page limit.
    PageLimit {
        /// Pages produced before the guard fired.
        pages: usize,
        /// Configured ceiling.
        max_pages: usize,
    },
}

impl fmt::Display for CarveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContent => write!(f, "No printable content"),
            Self::Markup(err) => write!(f, "{}", err),
            Self::Oracle(msg) => write!(f, "Measurement oracle unavailable: {}", msg),
            Self::PageLimit { pages, max_pages } => {
                write!(
                    f,
                    "Pagination exceeds max_pages ({} > {})",
                    pages, max_pages
                )
            }
        }
    }
}

impl std::error::Error for CarveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MarkupError> for CarveError {
    fn from(err: MarkupError) -> Self {
        Self::Markup(err)
    }
}

impl From<OracleError> for CarveError {
    fn from(err: OracleError) -> Self {
        Self::Oracle(err.to_string())
    }
}

/// Reject non-finite oracle measurements instead of guessing a height.
pub(crate) fn finite(value: f32, what: &str) -> Result<f32, CarveError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CarveError::Oracle(format!(
            "non-finite {} measurement: {}",
            what, value
        )))
    }
}
