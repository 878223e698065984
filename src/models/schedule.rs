// src/models/schedule.rs

//! Two-week schedule structures: Schedule, Week, Day, Lesson and SubLesson.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of weekdays stored per week (Monday..Sunday, Sunday is always empty).
pub const DAYS_PER_WEEK: usize = 7;

/// Number of timetabled periods per day.
pub const LESSONS_PER_DAY: usize = 8;

/// Time-of-day labels of the eight periods.
const PERIOD_TIMES: [&str; LESSONS_PER_DAY] = [
    "08:30-09:50",
    "10:00-11:20",
    "11:30-12:50",
    "13:30-14:50",
    "15:00-16:20",
    "16:30-17:50",
    "18:00-19:20",
    "19:30-20:50",
];

/// Kind of lesson, decoded from the abbreviation before the subject name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Lecture,
    Laboratory,
    Practice,
    #[default]
    Unknown,
}

impl LessonType {
    /// Decode the type code found before the first period of a cell.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "лек" => Self::Lecture,
            "пр" => Self::Practice,
            "лаб" => Self::Laboratory,
            _ => Self::Unknown,
        }
    }

    /// Abbreviation used in formatted text. Empty for unknown types.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Lecture => "Лек.",
            Self::Laboratory => "Лаб.",
            Self::Practice => "Пр.",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Index of a period within the day (0..8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(u8);

impl Period {
    /// Create a period from a slot index, `None` when out of range.
    pub fn new(index: usize) -> Option<Self> {
        (index < LESSONS_PER_DAY).then_some(Self(index as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Ordinal shown to people (1-based).
    pub fn number(&self) -> usize {
        self.index() + 1
    }

    /// Time-of-day label, e.g. `08:30-09:50`.
    pub fn time(&self) -> &'static str {
        PERIOD_TIMES[self.index()]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.time())
    }
}

/// A single teacher + room + subject assignment within one period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubLesson {
    pub period: Period,

    #[serde(rename = "type")]
    pub kind: LessonType,

    /// Group attending the lesson
    pub group: String,

    /// Subject name
    pub name: String,

    pub teacher: String,

    pub room: String,

    /// Subgroup number when the group is split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<u8>,

    /// Free text replacing teacher and room for off-site practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,
}

/// One period's cell. Empty means no class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lesson {
    pub sub_lessons: Vec<SubLesson>,
}

impl Lesson {
    pub fn is_empty(&self) -> bool {
        self.sub_lessons.is_empty()
    }

    /// Period shared by all sub-lessons, if any.
    pub fn period(&self) -> Option<Period> {
        self.sub_lessons.first().map(|s| s.period)
    }
}

/// One weekday row with exactly eight lesson slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Day {
    /// Copy of the owning week's number
    pub week_number: u32,
    pub lessons: [Lesson; LESSONS_PER_DAY],
}

impl Day {
    pub fn is_empty(&self) -> bool {
        self.lessons.iter().all(Lesson::is_empty)
    }
}

/// Half-open date span `[start, end)` covered by a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Seven-day span starting at `start`.
    pub fn week_from(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(DAYS_PER_WEEK as i64),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// One teaching week of the two-week schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Week {
    /// Teaching-week ordinal printed by the institution
    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,

    pub days: [Day; DAYS_PER_WEEK],
}

impl Week {
    /// True when no day holds any sub-lesson.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Day::is_empty)
    }

    /// Patch the displayed week number, keeping the days' copies in sync.
    pub(crate) fn set_number(&mut self, number: u32) {
        self.number = number;
        for day in &mut self.days {
            day.week_number = number;
        }
    }

    /// Index (0 = Monday) of `date` within this week's range.
    pub fn weekday_of(&self, date: NaiveDate) -> Option<usize> {
        let range = self.range?;
        range
            .contains(date)
            .then(|| date.weekday().num_days_from_monday() as usize)
    }
}

/// Full two-week schedule of one group, teacher or room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub weeks: [Week; 2],
}

impl Schedule {
    /// True when both weeks are empty.
    pub fn is_empty(&self) -> bool {
        self.weeks.iter().all(Week::is_empty)
    }

    /// Iterate every non-empty lesson with its (week, day, lesson) coordinate.
    pub fn lessons(&self) -> impl Iterator<Item = ((usize, usize, usize), &Lesson)> {
        self.weeks.iter().enumerate().flat_map(|(w, week)| {
            week.days.iter().enumerate().flat_map(move |(d, day)| {
                day.lessons
                    .iter()
                    .enumerate()
                    .filter(|(_, lesson)| !lesson.is_empty())
                    .map(move |(l, lesson)| ((w, d, l), lesson))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_lesson(period: usize) -> SubLesson {
        SubLesson {
            period: Period::new(period).unwrap(),
            kind: LessonType::Lecture,
            group: "ПИбд-21".to_string(),
            name: "Физика".to_string(),
            teacher: "Иванов И И".to_string(),
            room: "3-305".to_string(),
            ..SubLesson::default()
        }
    }

    #[test]
    fn test_lesson_type_from_code() {
        assert_eq!(LessonType::from_code("Лек"), LessonType::Lecture);
        assert_eq!(LessonType::from_code("пр"), LessonType::Practice);
        assert_eq!(LessonType::from_code("ЛАБ"), LessonType::Laboratory);
        assert_eq!(LessonType::from_code("Сем"), LessonType::Unknown);
    }

    #[test]
    fn test_period_bounds_and_labels() {
        assert_eq!(Period::new(0).unwrap().time(), "08:30-09:50");
        assert_eq!(Period::new(7).unwrap().time(), "19:30-20:50");
        assert_eq!(Period::new(7).unwrap().number(), 8);
        assert!(Period::new(8).is_none());
    }

    #[test]
    fn test_default_shapes() {
        let schedule = Schedule::default();
        for week in &schedule.weeks {
            assert_eq!(week.days.len(), DAYS_PER_WEEK);
            for day in &week.days {
                assert_eq!(day.lessons.len(), LESSONS_PER_DAY);
            }
        }
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_week_is_empty_iff_no_sub_lessons() {
        let mut week = Week::default();
        assert!(week.is_empty());

        week.days[5].lessons[7].sub_lessons.push(sub_lesson(7));
        assert!(!week.is_empty());

        let mut schedule = Schedule::default();
        schedule.weeks[1] = week;
        assert!(!schedule.is_empty());
        assert!(schedule.weeks[0].is_empty());
    }

    #[test]
    fn test_set_number_updates_days() {
        let mut week = Week::default();
        week.set_number(12);
        assert_eq!(week.number, 12);
        assert!(week.days.iter().all(|d| d.week_number == 12));
    }

    #[test]
    fn test_date_range_is_half_open() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let range = DateRange::week_from(start);
        assert!(range.contains(start));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 4, 21).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 4, 22).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 4, 14).unwrap()));
    }

    #[test]
    fn test_weekday_of_requires_range() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let mut week = Week::default();
        assert_eq!(week.weekday_of(start), None);

        week.range = Some(DateRange::week_from(start));
        assert_eq!(week.weekday_of(start), Some(0));
        assert_eq!(
            week.weekday_of(NaiveDate::from_ymd_opt(2024, 4, 21).unwrap()),
            Some(6)
        );
    }

    #[test]
    fn test_lessons_iterator_yields_coordinates() {
        let mut schedule = Schedule::default();
        schedule.weeks[1].days[2].lessons[3]
            .sub_lessons
            .push(sub_lesson(3));
        let found: Vec<_> = schedule.lessons().map(|(at, _)| at).collect();
        assert_eq!(found, vec![(1, 2, 3)]);
    }
}
