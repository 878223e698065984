// src/parser/mod.rs

//! HTML timetable parsing.
//!
//! A page is probed once for its [`PageLayout`], every `<p>` cell is mapped
//! to a (week, day, lesson) slot and the cell text is decomposed into
//! sub-lessons. The result is a fresh [`Schedule`] with both weeks numbered
//! and dated.

mod cell;
mod layout;
mod patterns;

use chrono::{Duration, NaiveDate};
use scraper::{ElementRef, Html, Selector};

use crate::calendar;
use crate::error::{AppError, Result};
use crate::models::{DateRange, EntityKind, Lesson, Period, Schedule};

pub use cell::{decompose_group_cell, decompose_teacher_cell};
pub(crate) use cell::tidy_room;
pub use layout::{CellPosition, PageLayout, map_dated_index, map_fixed_index, slot_for_week};

/// Cell decomposer for one kind of page.
type Decompose = fn(&str, Period, &str) -> Lesson;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::selector(css, e))
}

/// Selectors used while walking a schedule page.
struct Selectors {
    table: Selector,
    cell: Selector,
    font: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            table: selector("table")?,
            cell: selector("p")?,
            font: selector("font")?,
        })
    }
}

/// Parses schedule pages of one group or teacher.
pub struct ScheduleParser {
    name: String,
    decompose: Decompose,
    selectors: Selectors,
}

impl ScheduleParser {
    /// Create a parser for the page of `name`. Rooms have no pages of their own.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Result<Self> {
        let decompose: Decompose = match kind {
            EntityKind::Group => decompose_group_cell,
            EntityKind::Teacher => decompose_teacher_cell,
            EntityKind::Room => {
                return Err(AppError::validation("rooms have no schedule page to parse"));
            }
        };
        Ok(Self {
            name: name.into(),
            decompose,
            selectors: Selectors::new()?,
        })
    }

    /// Parse a decoded page. `today` anchors week dates.
    pub fn parse(&self, html: &str, today: NaiveDate) -> Schedule {
        let document = Html::parse_document(html);
        let page_layout =
            PageLayout::detect(&document, &self.selectors.table, &self.selectors.cell);
        log::debug!("Parsing {} as {:?}", self.name, page_layout);

        let mut schedule = match page_layout {
            PageLayout::FixedDualTable => self.assemble_fixed(&document),
            PageLayout::TableWithDateRange => self.assemble_dated(&document, today),
        };
        complete_ranges(&mut schedule, today);
        schedule
    }

    fn assemble_fixed(&self, document: &Html) -> Schedule {
        let cells: Vec<ElementRef<'_>> = document.select(&self.selectors.cell).collect();
        let mut schedule = Schedule::default();

        // A short page prints a single week, numbered in its heading.
        let single_slot = if cells.len() == layout::FIXED_BOTH_WEEKS_CELLS {
            schedule.weeks[0].set_number(1);
            schedule.weeks[1].set_number(2);
            None
        } else {
            let number = layout::heading_week_number(&cells).unwrap_or(1);
            let slot = slot_for_week(number);
            schedule.weeks[slot].set_number(number);
            schedule.weeks[1 - slot].set_number(neighbour_number(number, slot));
            Some(slot)
        };

        for (i, cell) in cells.iter().enumerate() {
            let Some(position) = map_fixed_index(i) else {
                continue;
            };
            let week = match single_slot {
                Some(_) if position.week == 1 => continue,
                Some(slot) => slot,
                None => position.week,
            };
            self.place(&mut schedule, week, position.day, position.lesson, cell);
        }
        schedule
    }

    fn assemble_dated(&self, document: &Html, today: NaiveDate) -> Schedule {
        let mut schedule = Schedule::default();
        let mut numbers: [Option<u32>; 2] = [None, None];
        let mut taken = [false; 2];

        for (order, table) in document.select(&self.selectors.table).enumerate() {
            let cells: Vec<ElementRef<'_>> = table.select(&self.selectors.cell).collect();
            let number = layout::heading_week_number(&cells);

            let mut slot = number.map(slot_for_week).unwrap_or(order.min(1));
            if taken[slot] {
                slot = 1 - slot;
            }
            taken[slot] = true;
            numbers[slot] = number;

            schedule.weeks[slot].range = cells
                .get(layout::DATE_CELL)
                .and_then(|header| layout::week_start(&layout::cell_text(header), today))
                .map(DateRange::week_from);

            for (i, cell) in cells.iter().enumerate() {
                if let Some((day, lesson)) = map_dated_index(i) {
                    self.place(&mut schedule, slot, day, lesson, cell);
                }
            }
        }

        let numbers = match numbers {
            [Some(first), Some(second)] => [first, second],
            [Some(first), None] => [first, neighbour_number(first, 0)],
            [None, Some(second)] => [neighbour_number(second, 1), second],
            [None, None] => [1, 2],
        };
        for (week, number) in schedule.weeks.iter_mut().zip(numbers) {
            week.set_number(number);
        }
        schedule
    }

    fn place(
        &self,
        schedule: &mut Schedule,
        week: usize,
        day: usize,
        lesson: usize,
        cell: &ElementRef<'_>,
    ) {
        let Some(period) = Period::new(lesson) else {
            return;
        };
        let markup = layout::cell_markup(cell, &self.selectors.font);
        schedule.weeks[week].days[day].lessons[lesson] = (self.decompose)(&markup, period, &self.name);
    }
}

/// Text of the first `<p>` of a page, which names the schedule's owner.
pub fn page_heading(html: &str) -> Result<Option<String>> {
    let cell = selector("p")?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&cell)
        .next()
        .map(|p| layout::cell_text(&p).trim().to_string()))
}

/// Number of the week in the other slot: slot 0 is followed, slot 1 preceded.
fn neighbour_number(number: u32, slot: usize) -> u32 {
    if slot == 0 {
        number + 1
    } else {
        number.saturating_sub(1)
    }
}

/// Give both weeks a date range.
///
/// A single dated week dates the other by the difference of week numbers.
/// Without any date the week containing `today` takes the slot of its ISO
/// parity and the following week the other slot.
fn complete_ranges(schedule: &mut Schedule, today: NaiveDate) {
    let [first, second] = &mut schedule.weeks;
    match (first.range, second.range) {
        (Some(_), Some(_)) => {}
        (Some(known), None) => {
            second.range = Some(shifted(known, first.number, second.number, 1));
        }
        (None, Some(known)) => {
            first.range = Some(shifted(known, second.number, first.number, -1));
        }
        (None, None) => {
            let monday = calendar::monday_of(today);
            let (current, next) = if calendar::week_slot(today) == 0 {
                (first, second)
            } else {
                (second, first)
            };
            current.range = Some(DateRange::week_from(monday));
            next.range = Some(DateRange::week_from(monday + Duration::days(7)));
        }
    }
}

fn shifted(known: DateRange, from: u32, to: u32, fallback: i64) -> DateRange {
    let weeks = match to as i64 - from as i64 {
        0 => fallback,
        diff => diff,
    };
    DateRange::week_from(known.start + Duration::weeks(weeks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LessonType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Page of `count` cells in one table; `fill` supplies cell markup.
    fn page(count: usize, fill: impl Fn(usize) -> String) -> String {
        let cells: String = (0..count)
            .map(|i| format!("<tr><td><p><font>{}</font></p></td></tr>", fill(i)))
            .collect();
        format!("<html><body><table>{cells}</table><table><tr><td>x</td></tr></table></body></html>")
    }

    fn dated_table(heading: &str, monday: &str, fill: impl Fn(usize) -> String) -> String {
        let cells: String = (0..layout::DATED_TABLE_CELLS)
            .map(|i| {
                let text = match i {
                    0 => heading.to_string(),
                    layout::DATE_CELL => monday.to_string(),
                    _ => fill(i),
                };
                format!("<tr><td><p><font>{text}</font></p></td></tr>")
            })
            .collect();
        format!("<table>{cells}</table>")
    }

    #[test]
    fn test_fixed_page_with_both_weeks() {
        let html = page(layout::FIXED_BOTH_WEEKS_CELLS, |i| match i {
            22 => "Лек.Физика <br/>Иванов И И 1-205 <br/>".to_string(),
            120 => "Пр.Химия <br/>Петров П П 2-101 <br/>".to_string(),
            21 | 80 => "Лек.Лишнее <br/>Сидоров С С 3-303 <br/>".to_string(),
            _ => String::new(),
        });
        let parser = ScheduleParser::new(EntityKind::Group, "ПИбд-21").unwrap();
        let today = date(2024, 4, 17);
        let schedule = parser.parse(&html, today);

        assert_eq!(schedule.weeks[0].number, 1);
        assert_eq!(schedule.weeks[1].number, 2);
        let first = &schedule.weeks[0].days[0].lessons[0].sub_lessons;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, LessonType::Lecture);
        assert_eq!(first[0].name, "Физика");
        let last = &schedule.weeks[1].days[0].lessons[7].sub_lessons;
        assert_eq!(last[0].teacher, "Петров П П");
        assert_eq!(last[0].period.index(), 7);

        // only the two placed lessons exist
        assert_eq!(schedule.lessons().count(), 2);

        // 17.04.2024 lies in ISO week 16: slot 1
        assert!(schedule.weeks[1].range.unwrap().contains(today));
        assert_eq!(schedule.weeks[0].range.unwrap().start, date(2024, 4, 22));
    }

    #[test]
    fn test_fixed_page_with_single_week() {
        let html = page(100, |i| match i {
            0 => "Расписание занятий ПИбд-21. Неделя: 14-я".to_string(),
            35 => "Лаб.Сети <br/>Иванов И И 3-305 <br/>".to_string(),
            _ => String::new(),
        });
        let parser = ScheduleParser::new(EntityKind::Group, "ПИбд-21").unwrap();
        let schedule = parser.parse(&html, date(2024, 4, 17));

        assert_eq!(schedule.weeks[1].number, 14);
        assert_eq!(schedule.weeks[0].number, 13);
        assert!(schedule.weeks[0].is_empty());
        assert_eq!(schedule.weeks[1].days[1].lessons[3].sub_lessons[0].name, "Сети");
        assert!(schedule.weeks[1].days.iter().all(|d| d.week_number == 14));
    }

    #[test]
    fn test_dated_tables() {
        let first = dated_table("Неделя: 15-я", "Пнд 15.04", |i| {
            if i == 22 { "Лек.Физика <br/>Иванов И И 1-205".to_string() } else { String::new() }
        });
        let second = dated_table("Неделя: 16-я", "Пнд 22.04", |i| {
            if i == 79 { "Пр.Химия <br/>Петров П П 2-101".to_string() } else { String::new() }
        });
        let html = format!("<html><body>{first}{second}</body></html>");
        let parser = ScheduleParser::new(EntityKind::Group, "ПИбд-21").unwrap();
        let schedule = parser.parse(&html, date(2024, 4, 17));

        assert_eq!(schedule.weeks[0].number, 15);
        assert_eq!(schedule.weeks[1].number, 16);
        assert_eq!(schedule.weeks[0].range.unwrap().start, date(2024, 4, 15));
        assert_eq!(schedule.weeks[1].range.unwrap().start, date(2024, 4, 22));
        assert!(!schedule.weeks[0].days[0].lessons[0].is_empty());
        assert!(!schedule.weeks[1].days[5].lessons[7].is_empty());
    }

    #[test]
    fn test_single_dated_table_dates_the_other_week() {
        let only = dated_table("Неделя: 16-я", "Пнд 22.04", |_| String::new());
        let html = format!("<html><body>{only}</body></html>");
        let parser = ScheduleParser::new(EntityKind::Teacher, "Иванов И И").unwrap();
        let schedule = parser.parse(&html, date(2024, 4, 17));

        assert_eq!(schedule.weeks[1].number, 16);
        assert_eq!(schedule.weeks[0].number, 15);
        assert_eq!(schedule.weeks[0].range.unwrap().start, date(2024, 4, 15));
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_teacher_page_cells() {
        let html = page(layout::FIXED_BOTH_WEEKS_CELLS, |i| match i {
            0 => "Иванов И И".to_string(),
            23 => "ПИбд-21,ПИбд-22<br/>Лек.Физика<br/>6-101".to_string(),
            24 => "_".to_string(),
            _ => String::new(),
        });
        let parser = ScheduleParser::new(EntityKind::Teacher, "Иванов И И").unwrap();
        let schedule = parser.parse(&html, date(2024, 4, 17));

        let lesson = &schedule.weeks[0].days[0].lessons[1];
        assert_eq!(lesson.sub_lessons.len(), 2);
        assert!(schedule.weeks[0].days[0].lessons[2].is_empty());
        assert_eq!(page_heading(&html).unwrap().as_deref(), Some("Иванов И И"));
    }

    #[test]
    fn test_rooms_have_no_parser() {
        assert!(ScheduleParser::new(EntityKind::Room, "3-305").is_err());
    }
}
