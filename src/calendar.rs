// src/calendar.rs

//! Calendar helpers: user date input, weekday names and week parity.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

use crate::error::{AppError, Result};

/// Weekday names as printed in schedule texts, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}$").expect("date shape pattern"));

/// Half of the academic year a date belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semester {
    /// September 1 to December 31
    Fall,
    /// February 1 to June 30
    Spring,
}

impl Semester {
    /// Semester containing `date`, `None` during the breaks.
    pub fn of(date: NaiveDate) -> Option<Self> {
        match date.month() {
            9..=12 => Some(Self::Fall),
            2..=6 => Some(Self::Spring),
            _ => None,
        }
    }
}

/// Parse a `dd.mm` date of the current year.
///
/// The date must exist and lie in the same semester as `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if !DATE_SHAPE.is_match(input) {
        return Err(AppError::incorrect_date(input));
    }
    let (day, month) = input
        .split_once('.')
        .and_then(|(d, m)| Some((d.parse::<u32>().ok()?, m.parse::<u32>().ok()?)))
        .ok_or_else(|| AppError::incorrect_date(input))?;

    let date = NaiveDate::from_ymd_opt(today.year(), month, day)
        .ok_or_else(|| AppError::incorrect_date(input))?;

    match (Semester::of(today), Semester::of(date)) {
        (Some(current), Some(requested)) if current == requested => Ok(date),
        _ => Err(AppError::incorrect_date(input)),
    }
}

/// Index (0 = Monday) of a Russian weekday name, case-insensitive.
pub fn parse_weekday(name: &str) -> Result<usize> {
    let lowered = name.trim().to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|w| w.to_lowercase() == lowered)
        .ok_or_else(|| AppError::IncorrectWeekday {
            weekday: name.to_string(),
        })
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[weekday_index(date)]
}

pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Date of weekday `index` in the week containing `today`.
pub fn date_of_weekday(today: NaiveDate, index: usize) -> NaiveDate {
    monday_of(today) + Duration::days(index as i64)
}

/// Schedule slot (0 or 1) of the week containing `date`, by ISO week parity.
pub fn week_slot(date: NaiveDate) -> usize {
    (date.iso_week().week() as usize + 1) % 2
}

/// `dd.mm.yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Date carrying day-of-month `day` closest to `reference`, looking at the
/// reference month and its neighbours. Mondays win over closer weekdays.
pub fn nearest_day_of_month(day: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let first = reference.with_day(1)?;
    let months = [
        first.checked_sub_months(chrono::Months::new(1))?,
        first,
        first.checked_add_months(chrono::Months::new(1))?,
    ];
    months
        .iter()
        .filter_map(|m| NaiveDate::from_ymd_opt(m.year(), m.month(), day))
        .min_by_key(|date| {
            (
                date.weekday() != Weekday::Mon,
                (*date - reference).num_days().abs(),
            )
        })
}
