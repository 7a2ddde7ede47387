//! End-to-end pagination: greedy packing, cell-level splitting, and
//! exactly-once content accounting across page boundaries.

mod common;

use common::{DetachedOracle, GridOracle};
use pagecarve_layout::{
    pages_to_json, paginate, paginate_with, CarveError, Cell, Fragment, Page, PaginateOptions,
    Row, TruncateOptions,
};

fn opts(page_height: f32) -> PaginateOptions {
    PaginateOptions {
        page_height,
        start_top: 0.0,
        lead_height: 0.0,
        row_margin: 0.0,
        truncate: TruncateOptions {
            measure_slack: 0.0,
            ..TruncateOptions::default()
        },
        ..PaginateOptions::default()
    }
}

fn text_row(text: &str) -> Row {
    Row::new(vec![Cell::new(format!("<p>{}</p>", text))])
}

fn cell_text(cell: &Cell) -> String {
    if cell.markup.is_empty() {
        return String::new();
    }
    Fragment::parse(&cell.markup)
        .unwrap_or_else(|err| panic!("cell markup {:?}: {}", cell.markup, err))
        .visible_text()
}

/// Concatenated text of one column across all pages, markers stripped.
fn column_text(pages: &[Page], column: usize) -> String {
    let mut out = String::new();
    for page in pages {
        for row in &page.rows {
            let text = cell_text(&row.cells[column]);
            out.push_str(text.strip_suffix("...").unwrap_or(&text));
        }
    }
    out
}

#[test]
fn six_full_rows_plus_partial_seventh_make_two_pages() {
    let mut oracle = GridOracle::new(10, 0);
    // every row wraps to two 10px lines; 130px holds six rows and one line
    let rows: Vec<Row> = (0..10).map(|_| text_row("aaaa bbbb cccc dddd")).collect();
    let pages = paginate_with(rows, &opts(130.0), &mut oracle).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].rows.len(), 7, "row 7 should close page 1 as a split");
    assert_eq!(pages[1].rows.len(), 4, "page 2 = remainder of row 7 + rows 8-10");

    let split_text = cell_text(&pages[0].rows[6].cells[0]);
    assert!(split_text.ends_with("..."), "split row should carry the marker");
    let head = cell_text(&pages[1].rows[0].cells[0]);
    assert!(
        "aaaa bbbb cccc dddd".ends_with(&head),
        "page 2 should open with row 7's remainder, got {:?}",
        head
    );
}

#[test]
fn content_is_conserved_exactly_once_per_column() {
    let mut oracle = GridOracle::new(10, 0);
    let left = ["aaaa bbbb cccc dddd", "eeee ffff gggg hhhh iiii"];
    let right = ["alpha beta", "gamma"];
    let rows = vec![
        Row::new(vec![
            Cell::new(format!("<p>{}</p>", left[0])),
            Cell::new(format!("<p>{}</p>", right[0])),
        ]),
        Row::new(vec![
            Cell::new(format!("<p>{}</p>", left[1])),
            Cell::new(format!("<p>{}</p>", right[1])),
        ]),
    ];
    let pages = paginate_with(rows, &opts(30.0), &mut oracle).unwrap();
    assert!(pages.len() > 1);
    assert_eq!(column_text(&pages, 0), left.concat());
    assert_eq!(column_text(&pages, 1), right.concat());
}

#[test]
fn closed_pages_respect_the_budget() {
    let mut oracle = GridOracle::new(10, 0);
    let rows: Vec<Row> = (0..9).map(|_| text_row("aaaa bbbb cccc")).collect();
    let options = opts(50.0);
    let pages = paginate_with(rows, &options, &mut oracle).unwrap();
    assert!(pages.len() > 1);
    for (index, page) in pages.iter().enumerate() {
        assert!(
            page.height <= options.page_height,
            "page {} height {} exceeds budget {}",
            index,
            page.height,
            options.page_height
        );
        assert!(!page.rows.is_empty(), "page {} has no rows", index);
    }
}

#[test]
fn a_row_spans_at_most_two_adjacent_pages() {
    let mut oracle = GridOracle::new(10, 0);
    let rows: Vec<Row> = (0..6).map(|_| text_row("aaaa bbbb cccc dddd")).collect();
    let pages = paginate_with(rows, &opts(50.0), &mut oracle).unwrap();
    // marker-carrying rows may only sit at the end of a page, and their
    // remainder must open the next page
    for (index, page) in pages.iter().enumerate() {
        for (row_index, row) in page.rows.iter().enumerate() {
            let text = cell_text(&row.cells[0]);
            if text.ends_with("...") {
                assert_eq!(
                    row_index,
                    page.rows.len() - 1,
                    "split row must close its page"
                );
                assert!(index + 1 < pages.len(), "split row needs a following page");
            }
        }
    }
}

#[test]
fn unshowable_row_is_force_placed_to_terminate() {
    let mut oracle = GridOracle::new(10, 0);
    // less than one line of budget: no truncated form can be shown
    let rows = vec![text_row("aaaa bbbb")];
    let pages = paginate_with(rows, &opts(8.0), &mut oracle).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].rows.len(), 1);
    assert_eq!(cell_text(&pages[0].rows[0].cells[0]), "aaaa bbbb");
}

#[test]
fn empty_row_list_is_no_content() {
    let mut oracle = GridOracle::new(10, 0);
    let err = paginate(Vec::new(), &mut oracle).unwrap_err();
    assert!(matches!(err, CarveError::NoContent));
}

#[test]
fn non_finite_row_measurement_is_an_oracle_error() {
    let mut oracle = DetachedOracle;
    let err = paginate(vec![text_row("text")], &mut oracle).unwrap_err();
    assert!(matches!(err, CarveError::Oracle(_)));
}

#[test]
fn lead_height_is_charged_on_every_page() {
    let mut oracle = GridOracle::new(10, 0);
    let options = PaginateOptions {
        lead_height: 10.0,
        ..opts(40.0)
    };
    // two-line rows: with a 10px lead only one fits per page
    let rows: Vec<Row> = (0..3).map(|_| text_row("aaaa bbbb cccc dddd")).collect();
    let pages = paginate_with(rows, &options, &mut oracle).unwrap();
    for page in &pages {
        assert!(page.height >= options.lead_height);
        assert!(page.height <= options.page_height);
    }
    assert_eq!(column_text(&pages, 0), "aaaa bbbb cccc dddd".repeat(3));
}

#[test]
fn page_descriptors_round_trip_through_json() {
    let mut oracle = GridOracle::new(10, 0);
    let rows: Vec<Row> = (0..4).map(|_| text_row("aaaa bbbb cccc dddd")).collect();
    let pages = paginate_with(rows, &opts(50.0), &mut oracle).unwrap();
    let json = pages_to_json(&pages).unwrap();
    let parsed: Vec<Page> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, pages);
}
