//! Page layouts and the cell index arithmetic behind them.
//!
//! Timetable pages carry no semantic markup, so every `<p>` cell is placed
//! by its position in document order.

use scraper::{ElementRef, Html, Selector};

use crate::calendar;

use super::patterns::{NUMBER, WEEK_NUMBER};

/// `<p>` cells of one dated week table.
pub const DATED_TABLE_CELLS: usize = 91;

/// `<p>` cells of a page that prints both weeks in the fixed layout.
pub const FIXED_BOTH_WEEKS_CELLS: usize = 182;

/// Local index of the Monday row header in a dated table.
pub const DATE_CELL: usize = 20;

/// Structure of a schedule page, picked once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// Both weeks laid out one after another in page-wide cell order.
    FixedDualTable,
    /// One table per week, each headed by its number and start date.
    TableWithDateRange,
}

impl PageLayout {
    /// One or two tables holding exactly [`DATED_TABLE_CELLS`] cells each
    /// mean the dated layout; anything else is the fixed one.
    pub fn detect(document: &Html, table: &Selector, cell: &Selector) -> Self {
        let tables: Vec<ElementRef<'_>> = document.select(table).collect();
        let dated = (1..=2).contains(&tables.len())
            && tables
                .iter()
                .all(|t| t.select(cell).count() == DATED_TABLE_CELLS);
        if dated {
            Self::TableWithDateRange
        } else {
            Self::FixedDualTable
        }
    }
}

/// Place of a cell in the two-week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub week: usize,
    pub day: usize,
    pub lesson: usize,
}

/// Map a page-wide cell index of the fixed layout.
///
/// Week 1 rows hold lessons at `i % 10` in `2..=9`. Week 2 rows are shifted
/// by one: lessons 1..7 sit at `3..=9` and lesson 8 wraps onto the next row's
/// `0` slot.
pub fn map_fixed_index(i: usize) -> Option<CellPosition> {
    let (row, col) = (i / 10, i % 10);
    if (22..=79).contains(&i) && (2..=9).contains(&col) {
        return Some(CellPosition {
            week: 0,
            day: row - 2,
            lesson: col - 2,
        });
    }
    if (113..=170).contains(&i) {
        return match col {
            0 => Some(CellPosition {
                week: 1,
                day: row - 12,
                lesson: 7,
            }),
            3..=9 => Some(CellPosition {
                week: 1,
                day: row - 11,
                lesson: col - 3,
            }),
            _ => None,
        };
    }
    None
}

/// Map a table-local cell index of the dated layout to `(day, lesson)`.
pub fn map_dated_index(i: usize) -> Option<(usize, usize)> {
    let (row, col) = (i / 10, i % 10);
    ((20..=79).contains(&i) && (2..=9).contains(&col)).then(|| (row - 2, col - 2))
}

/// Schedule slot of a teaching week number: odd weeks first.
pub fn slot_for_week(number: u32) -> usize {
    if number % 2 == 1 { 0 } else { 1 }
}

/// Teaching week number printed in the heading cells before the grid.
pub fn heading_week_number(cells: &[ElementRef<'_>]) -> Option<u32> {
    cells.iter().take(DATE_CELL).find_map(|cell| {
        let text = cell_text(cell);
        WEEK_NUMBER
            .captures(&text)
            .and_then(|caps| caps[1].parse().ok())
    })
}

/// Start date of a dated week from its Monday row header.
pub fn week_start(header: &str, today: chrono::NaiveDate) -> Option<chrono::NaiveDate> {
    let day = NUMBER.find(header)?.as_str().parse().ok()?;
    calendar::nearest_day_of_month(day, today)
}

pub fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>()
}

/// Inner markup of a cell: its first `<font>` when present.
pub fn cell_markup(cell: &ElementRef<'_>, font: &Selector) -> String {
    cell.select(font)
        .next()
        .map(|f| f.inner_html())
        .unwrap_or_else(|| cell.inner_html())
}
