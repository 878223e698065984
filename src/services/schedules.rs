//! Schedule retrieval and queries for groups, teachers and rooms.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};

use crate::calendar;
use crate::error::{AppError, Result};
use crate::models::{Config, Day, EntityKind, Schedule, Week};
use crate::parser::{ScheduleParser, tidy_room};
use crate::services::{DirectoryEntry, DirectoryResolver};
use crate::utils::http::PageSource;

/// Which day to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayQuery {
    /// Days after today (0 = today)
    Offset(i64),
    /// `dd.mm` of the current year
    Date(String),
    /// Russian weekday name within the current week
    Weekday(String),
}

/// A day picked from a schedule together with its calendar date.
#[derive(Debug, Clone)]
pub struct DayReport {
    pub date: NaiveDate,
    pub week_slot: usize,
    pub day: Day,
}

/// Fetches and queries schedules.
pub struct ScheduleService<'a> {
    source: &'a dyn PageSource,
    config: &'a Config,
}

impl<'a> ScheduleService<'a> {
    pub fn new(source: &'a dyn PageSource, config: &'a Config) -> Self {
        Self { source, config }
    }

    pub fn resolver(&self) -> DirectoryResolver<'a> {
        DirectoryResolver::new(self.source, &self.config.sources)
    }

    /// Full two-week schedule of any entity kind.
    pub async fn schedule(&self, kind: EntityKind, name: &str, today: NaiveDate) -> Result<Schedule> {
        match kind {
            EntityKind::Room => self.room_schedule(name, today).await,
            _ => {
                let page = self.resolver().resolve(kind, name).await?;
                let parser = ScheduleParser::new(kind, name)?;
                Ok(parser.parse(&page.html, today))
            }
        }
    }

    /// Full schedule, reported as unavailable when nothing is published.
    pub async fn full(&self, kind: EntityKind, name: &str, today: NaiveDate) -> Result<Schedule> {
        let schedule = self.schedule(kind, name, today).await?;
        if schedule.is_empty() {
            return Err(AppError::unavailable(name, None, None));
        }
        Ok(schedule)
    }

    /// One day of the schedule.
    ///
    /// Sundays come back empty without further checks. Otherwise an empty
    /// schedule or an empty week is reported as unavailable.
    pub async fn day(
        &self,
        kind: EntityKind,
        name: &str,
        query: &DayQuery,
        today: NaiveDate,
    ) -> Result<DayReport> {
        let date = match query {
            DayQuery::Offset(offset) => today + chrono::Duration::days(*offset),
            DayQuery::Date(input) => calendar::parse_date(input, today)?,
            DayQuery::Weekday(weekday) => {
                calendar::date_of_weekday(today, calendar::parse_weekday(weekday)?)
            }
        };

        let schedule = self.schedule(kind, name, today).await?;
        let (week_slot, day) = schedule.day_on(date)?;
        let weekday = calendar::weekday_index(date);

        if weekday != 6 {
            if schedule.is_empty() {
                return Err(AppError::unavailable(name, None, None));
            }
            if schedule.weeks[week_slot].is_empty() {
                return Err(AppError::unavailable(name, Some(week_slot), Some(weekday)));
            }
        }

        Ok(DayReport {
            date,
            week_slot,
            day: day.clone(),
        })
    }

    /// Current or next week of the schedule.
    pub async fn week(
        &self,
        kind: EntityKind,
        name: &str,
        next: bool,
        today: NaiveDate,
    ) -> Result<(usize, Week)> {
        let schedule = self.schedule(kind, name, today).await?;
        let (slot, week) = if next {
            schedule.next_week(today)?
        } else {
            schedule.current_week(today)?
        };
        if week.is_empty() {
            return Err(AppError::unavailable(name, Some(slot), None));
        }
        Ok((slot, week.clone()))
    }

    /// Week by slot index (0 or 1).
    pub async fn week_by_slot(
        &self,
        kind: EntityKind,
        name: &str,
        slot: usize,
        today: NaiveDate,
    ) -> Result<Week> {
        if slot > 1 {
            return Err(AppError::IncorrectWeekNumber { week: slot });
        }
        let schedule = self.schedule(kind, name, today).await?;
        let week = schedule.week(slot)?;
        if week.is_empty() {
            return Err(AppError::unavailable(name, Some(slot), None));
        }
        Ok(week.clone())
    }

    /// Schedule of a room, gathered from every teacher's schedule.
    ///
    /// Teacher pages that fail to load are logged and skipped. Pages are
    /// collected in directory order, so week numbers come from the first
    /// teacher listed whose page loads.
    pub async fn room_schedule(&self, room: &str, today: NaiveDate) -> Result<Schedule> {
        let wanted = normalize_room(room);
        let entries = self.resolver().entries(EntityKind::Teacher).await?;
        log::info!("Scanning {} teacher schedules for room {}", entries.len(), room);

        let concurrency = self.config.http.max_concurrent.max(1);
        let schedules: Vec<Schedule> = stream::iter(entries)
            .map(|entry| async move {
                let result = self.teacher_page(&entry, today).await;
                (entry, result)
            })
            .buffered(concurrency)
            .filter_map(|(entry, result)| async move {
                match result {
                    Ok(schedule) => Some(schedule),
                    Err(e) => {
                        log::warn!("Skipping teacher {:?}: {}", entry.names.first(), e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(collect_room(&schedules, &wanted))
    }

    async fn teacher_page(&self, entry: &DirectoryEntry, today: NaiveDate) -> Result<Schedule> {
        let teacher = entry.names.first().map(String::as_str).unwrap_or_default();
        let html = self.source.fetch(&entry.url).await?;
        Ok(ScheduleParser::new(EntityKind::Teacher, teacher)?.parse(&html, today))
    }
}

fn normalize_room(room: &str) -> String {
    tidy_room(room).replace(' ', "").to_lowercase()
}

/// Copy every sub-lesson held in `room` into a fresh schedule, keeping slots.
/// Week numbers and dates come from the first schedule.
fn collect_room(schedules: &[Schedule], room: &str) -> Schedule {
    let mut result = Schedule::default();
    if let Some(first) = schedules.first() {
        for (target, source) in result.weeks.iter_mut().zip(&first.weeks) {
            target.set_number(source.number);
            target.range = source.range;
        }
    }

    for schedule in schedules {
        for ((w, d, l), lesson) in schedule.lessons() {
            let held_here = lesson
                .sub_lessons
                .iter()
                .filter(|sub| normalize_room(&sub.room) == room)
                .cloned();
            result.weeks[w].days[d].lessons[l].sub_lessons.extend(held_here);
        }
    }
    result
}
