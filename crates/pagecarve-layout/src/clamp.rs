//! Configuration surface for clamping and pagination.

use pagecarve::DEFAULT_SEPARATORS;

/// Slack subtracted from every raw height measurement.
///
/// Compensates for the border/padding of the visual theme the measurements
/// were calibrated against.
pub const MEASURE_SLACK_PX: f32 = 4.0;

/// Safety margin kept between packed rows and the page edge.
pub const ROW_SAFETY_MARGIN_PX: f32 = 10.0;

/// Default page budget: A4 portrait height at 96 dpi.
pub const A4_PAGE_HEIGHT_PX: f32 = 1122.52;

/// Truncation limit for a clamped container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Clamp {
    /// Derive the line budget from the container's current height.
    #[default]
    Auto,
    /// Clamp to an explicit number of text lines.
    Lines(u32),
    /// Clamp to a pixel height, rounded down to whole lines.
    Px(f32),
}

/// Options for markup truncation.
#[derive(Clone, Debug, PartialEq)]
pub struct TruncateOptions {
    /// Truncation limit.
    pub clamp: Clamp,
    /// Separator characters for the segment phase of the search. Each
    /// separator is kept as its own segment so joins re-append it.
    pub split_on: Vec<char>,
    /// Continuation marker appended at the cut point.
    pub marker: String,
    /// Slack subtracted from every raw height measurement.
    pub measure_slack: f32,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            clamp: Clamp::Auto,
            split_on: DEFAULT_SEPARATORS.to_vec(),
            marker: "...".to_owned(),
            measure_slack: MEASURE_SLACK_PX,
        }
    }
}

/// Guard limits for pagination growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginateLimits {
    /// Maximum number of pages a single call may produce.
    pub max_pages: usize,
}

impl Default for PaginateLimits {
    fn default() -> Self {
        Self { max_pages: 4096 }
    }
}

/// Options for row pagination.
#[derive(Clone, Debug, PartialEq)]
pub struct PaginateOptions {
    /// Vertical budget of one page.
    pub page_height: f32,
    /// Top offset of the first page's content within the surface.
    pub start_top: f32,
    /// Fixed height re-consumed at the top of every page (e.g. a repeated
    /// table header).
    pub lead_height: f32,
    /// Safety margin kept between packed rows and the page edge.
    pub row_margin: f32,
    /// Cell truncation options used when a row must be split. The `clamp`
    /// field is ignored here: the paginator derives a pixel clamp from the
    /// remaining page budget for each split.
    pub truncate: TruncateOptions,
    /// Hard guard limits.
    pub limits: PaginateLimits,
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            page_height: A4_PAGE_HEIGHT_PX,
            start_top: 0.0,
            lead_height: 0.0,
            row_margin: ROW_SAFETY_MARGIN_PX,
            truncate: TruncateOptions::default(),
            limits: PaginateLimits::default(),
        }
    }
}

impl PaginateOptions {
    /// Convenience for a page budget with the remaining fields defaulted.
    pub fn for_page_height(page_height: f32) -> Self {
        Self {
            page_height,
            ..Self::default()
        }
    }
}
