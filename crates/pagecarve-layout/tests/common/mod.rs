//! Shared test fixtures: a deterministic character-grid oracle standing in
//! for a real rendering surface.

use pagecarve_layout::{Fragment, HeightOracle, OracleError, PageOracle, Row};

/// Monospace grid surface: every character occupies one cell, text wraps at
/// `cols` characters per line, and rendered height is the wrapped line
/// count times the line height. Height is non-decreasing in content length,
/// which is the monotonicity the truncation search requires.
pub struct GridOracle {
    pub cols: usize,
    pub line_height: f32,
    pub container_lines: usize,
    /// Number of content measurements served, for probe-count assertions.
    pub content_probes: usize,
}

impl GridOracle {
    pub fn new(cols: usize, container_lines: usize) -> Self {
        Self {
            cols,
            line_height: 10.0,
            container_lines,
            content_probes: 0,
        }
    }

    fn wrapped_lines(&self, chars: usize) -> usize {
        if chars == 0 {
            0
        } else {
            chars.div_ceil(self.cols)
        }
    }
}

impl HeightOracle for GridOracle {
    fn content_height(&mut self, fragment: &Fragment) -> Result<f32, OracleError> {
        self.content_probes += 1;
        Ok(self.wrapped_lines(fragment.text_len()) as f32 * self.line_height)
    }

    fn container_height(&mut self) -> Result<f32, OracleError> {
        Ok(self.container_lines as f32 * self.line_height)
    }

    fn line_height(&mut self) -> Result<f32, OracleError> {
        Ok(self.line_height)
    }
}

impl PageOracle for GridOracle {
    fn row_height(&mut self, row: &Row) -> Result<f32, OracleError> {
        let mut lines = 0usize;
        for cell in &row.cells {
            let fragment =
                Fragment::parse(&cell.markup).map_err(|err| OracleError::new(err.to_string()))?;
            lines = lines.max(self.wrapped_lines(fragment.text_len()));
        }
        Ok(lines as f32 * self.line_height)
    }

    fn cell_height(&mut self, _column: usize, fragment: &Fragment) -> Result<f32, OracleError> {
        self.content_probes += 1;
        Ok(self.wrapped_lines(fragment.text_len()) as f32 * self.line_height)
    }

    fn cell_line_height(&mut self, _column: usize) -> Result<f32, OracleError> {
        Ok(self.line_height)
    }
}

/// Oracle whose surface has gone away.
pub struct DetachedOracle;

impl HeightOracle for DetachedOracle {
    fn content_height(&mut self, _fragment: &Fragment) -> Result<f32, OracleError> {
        Err(OracleError::new("measuring surface detached"))
    }

    fn container_height(&mut self) -> Result<f32, OracleError> {
        Err(OracleError::new("measuring surface detached"))
    }

    fn line_height(&mut self) -> Result<f32, OracleError> {
        Ok(10.0)
    }
}

impl PageOracle for DetachedOracle {
    fn row_height(&mut self, _row: &Row) -> Result<f32, OracleError> {
        Ok(f32::INFINITY)
    }

    fn cell_height(&mut self, _column: usize, _fragment: &Fragment) -> Result<f32, OracleError> {
        Ok(f32::NAN)
    }

    fn cell_line_height(&mut self, _column: usize) -> Result<f32, OracleError> {
        Ok(10.0)
    }
}
