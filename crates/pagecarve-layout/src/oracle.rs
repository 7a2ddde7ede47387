//! Measurement oracle boundary.
//!
//! The core algorithms never measure anything themselves; they hand a
//! candidate fragment to an oracle and read back a height. Implementations
//! are expected to be backed by a real rendering surface (an off-screen
//! clone of the target container), which is why every method takes `&mut
//! self` and may fail.

use core::fmt;

use pagecarve::Fragment;

use crate::paginate::Row;

/// Error raised when a measurement cannot be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleError(String);

impl OracleError {
    /// Wrap a message describing the failed measurement.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for OracleError {}

/// Height measurement hook for a single clamped container.
///
/// Precondition for the truncation search: rendered height must be
/// non-decreasing in content length. The binary search assumes a single
/// fits/overflows threshold and will cut at the wrong place if the surface
/// violates that.
pub trait HeightOracle {
    /// Rendered content height of `fragment` laid out in the container.
    fn content_height(&mut self, fragment: &Fragment) -> Result<f32, OracleError>;

    /// Inner height of the fixed container box.
    fn container_height(&mut self) -> Result<f32, OracleError>;

    /// Effective line height of the container's text.
    fn line_height(&mut self) -> Result<f32, OracleError>;
}

/// Row and cell measurement hook for pagination.
///
/// Cells are addressed by column index so an implementation can keep one
/// prepared measuring container per column width.
pub trait PageOracle {
    /// Rendered height of a whole row.
    fn row_height(&mut self, row: &Row) -> Result<f32, OracleError>;

    /// Rendered height of `fragment` laid out in column `column`.
    fn cell_height(&mut self, column: usize, fragment: &Fragment) -> Result<f32, OracleError>;

    /// Effective line height of text in column `column`.
    fn cell_line_height(&mut self, column: usize) -> Result<f32, OracleError>;
}
