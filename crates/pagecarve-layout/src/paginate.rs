//! Greedy row packing across fixed-height pages.
//!
//! Rows are pulled from a queue and packed while they fit. The first row
//! that overflows the page is split cell by cell through the truncation
//! pipeline: the fitting halves close the current page and the remainder
//! halves go back to the head of the queue for the next page, so content is
//! emitted exactly once and a row spans at most two adjacent pages.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use pagecarve::{fission, Fragment};

use crate::clamp::{PaginateLimits, PaginateOptions};
use crate::error::{finite, CarveError};
use crate::oracle::PageOracle;
use crate::truncate::{lines_in, walk_fragment};

/// One table cell owning its content markup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Inner markup of the cell.
    pub markup: String,
}

impl Cell {
    /// Cell holding the given markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Cell with no content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the cell holds no markup at all.
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }
}

/// One row: an ordered sequence of cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in column order.
    pub cells: Vec<Cell>,
}

impl Row {
    /// Row over the given cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// True when every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

/// One output page descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Top offset of this page's content within the overall surface.
    pub top: f32,
    /// Accumulated content height (lead plus packed rows).
    pub height: f32,
    /// Rows packed into this page, in order.
    pub rows: Vec<Row>,
}

impl Page {
    fn open(top: f32, lead_height: f32) -> Self {
        Self {
            top,
            height: lead_height,
            rows: Vec::with_capacity(8),
        }
    }
}

/// Serialize page descriptors for a report-assembly consumer.
pub fn pages_to_json(pages: &[Page]) -> Result<String, serde_json::Error> {
    serde_json::to_string(pages)
}

/// Paginate `rows` with default options.
pub fn paginate(rows: Vec<Row>, oracle: &mut dyn PageOracle) -> Result<Vec<Page>, CarveError> {
    paginate_with(rows, &PaginateOptions::default(), oracle)
}

/// Pack `rows` into pages bounded by the configured vertical budget.
///
/// A row that does not fit the space left on the current page is split cell
/// by cell; the fitting halves close the page and the remainder halves are
/// requeued at the head for the next page. A row whose content cannot be
/// shown at all even on a fresh page is force-placed whole so the call
/// always terminates; that page is the only one allowed to exceed the
/// budget. Fails with [`CarveError::NoContent`] when `rows` is empty.
pub fn paginate_with(
    rows: Vec<Row>,
    opts: &PaginateOptions,
    oracle: &mut dyn PageOracle,
) -> Result<Vec<Page>, CarveError> {
    if rows.is_empty() {
        return Err(CarveError::NoContent);
    }

    let mut queue: VecDeque<Row> = rows.into();
    let mut pages: Vec<Page> = Vec::with_capacity(8);
    let mut page = Page::open(opts.start_top, opts.lead_height);

    while let Some(row) = queue.pop_front() {
        let row_height = finite(oracle.row_height(&row)?, "row height")?;
        let remaining = opts.page_height - page.top - page.height - opts.row_margin;

        if remaining > 0.0 && row_height <= remaining {
            page.height += row_height;
            page.rows.push(row);
            continue;
        }

        let fresh = page.rows.is_empty() && page.top == 0.0;
        if remaining > 0.0 {
            let split = split_row(&row, remaining, opts, oracle)?;
            if split.progressed {
                page.rows.push(split.fitting);
                page.height += remaining;
                if !split.remainder.is_blank() {
                    queue.push_front(split.remainder);
                }
                close_page(&mut pages, page, &opts.limits)?;
                page = Page::open(0.0, opts.lead_height);
                continue;
            }
        }

        if fresh {
            // not even a fully truncated form fits an empty page
            log::warn!(
                "row with {} cells exceeds an empty page; force-placing to preserve content",
                row.cells.len()
            );
            page.height += row_height;
            page.rows.push(row);
            continue;
        }

        // retry the row against a fresh page
        queue.push_front(row);
        if !page.rows.is_empty() {
            close_page(&mut pages, page, &opts.limits)?;
        }
        page = Page::open(0.0, opts.lead_height);
    }

    if !page.rows.is_empty() {
        close_page(&mut pages, page, &opts.limits)?;
    }
    Ok(pages)
}

fn close_page(
    pages: &mut Vec<Page>,
    page: Page,
    limits: &PaginateLimits,
) -> Result<(), CarveError> {
    if pages.len() >= limits.max_pages {
        return Err(CarveError::PageLimit {
            pages: pages.len() + 1,
            max_pages: limits.max_pages,
        });
    }
    log::debug!(
        "page {} closed: rows={} height={}",
        pages.len(),
        page.rows.len(),
        page.height
    );
    pages.push(page);
    Ok(())
}

struct RowSplit {
    fitting: Row,
    remainder: Row,
    /// Whether the split consumed any content, i.e. the remainder is
    /// strictly smaller than the original row.
    progressed: bool,
}

/// Split every cell of `row` against the remaining page budget.
///
/// A cell whose full content fits goes out unchanged with an empty
/// remainder; otherwise the truncation pipeline produces the visible prefix
/// and the fission remainder for the same offset.
fn split_row(
    row: &Row,
    budget: f32,
    opts: &PaginateOptions,
    oracle: &mut dyn PageOracle,
) -> Result<RowSplit, CarveError> {
    let slack = opts.truncate.measure_slack;
    let marker_len = opts.truncate.marker.chars().count();
    let mut fitting = Vec::with_capacity(row.cells.len());
    let mut remainder = Vec::with_capacity(row.cells.len());
    let mut progressed = false;

    for (column, cell) in row.cells.iter().enumerate() {
        let fragment = Fragment::parse(&cell.markup)?;
        if fragment.is_empty() {
            fitting.push(Cell::empty());
            remainder.push(Cell::empty());
            continue;
        }

        let line_height = finite(oracle.cell_line_height(column)?, "cell line height")?;
        let cell_budget = lines_in(budget, line_height) * line_height;
        let full_height = finite(oracle.cell_height(column, &fragment)?, "cell height")? - slack;
        if full_height <= cell_budget {
            progressed = true;
            fitting.push(cell.clone());
            remainder.push(Cell::empty());
            continue;
        }

        let mut work = fragment;
        let mut measure = |candidate: &Fragment| -> Result<f32, CarveError> {
            Ok(finite(oracle.cell_height(column, candidate)?, "cell height")? - slack)
        };
        let cut = walk_fragment(&mut work, cell_budget, &opts.truncate, &mut measure)?;
        if cut {
            progressed = true;
            let visible = work.text_len().saturating_sub(marker_len);
            fitting.push(Cell::new(work.serialize()));
            remainder.push(Cell::new(fission(&cell.markup, visible)?));
        } else {
            fitting.push(Cell::empty());
            remainder.push(cell.clone());
        }
    }

    Ok(RowSplit {
        fitting: Row::new(fitting),
        remainder: Row::new(remainder),
        progressed,
    })
}
