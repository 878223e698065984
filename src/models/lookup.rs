//! Date and week lookups on an assembled schedule.

use chrono::{Duration, NaiveDate};

use crate::calendar;
use crate::error::{AppError, Result};

use super::schedule::{Day, Schedule, Week};

impl Schedule {
    /// Week by slot index (0 or 1).
    pub fn week(&self, slot: usize) -> Result<&Week> {
        self.weeks
            .get(slot)
            .ok_or(AppError::IncorrectWeekNumber { week: slot })
    }

    /// Slot of the week whose date range contains `date`.
    ///
    /// Outside every range the error carries the teaching week number
    /// extrapolated from a dated week. A schedule without any dates falls
    /// back to ISO week parity.
    pub fn week_index_on(&self, date: NaiveDate) -> Result<usize> {
        if let Some(slot) = self
            .weeks
            .iter()
            .position(|w| w.range.is_some_and(|r| r.contains(date)))
        {
            return Ok(slot);
        }

        let anchor = self
            .weeks
            .iter()
            .find_map(|w| w.range.map(|r| (w.number, r.start)));
        match anchor {
            Some((number, start)) => {
                let weeks = (date - start).num_days().div_euclid(7);
                Err(AppError::OutOfRange {
                    date: calendar::format_date(date),
                    week_number: number as i64 + weeks,
                })
            }
            None => Ok(calendar::week_slot(date)),
        }
    }

    /// Day covering `date` with its week slot. Sunday yields the empty
    /// placeholder day.
    pub fn day_on(&self, date: NaiveDate) -> Result<(usize, &Day)> {
        let slot = self.week_index_on(date)?;
        let week = &self.weeks[slot];
        let weekday = week
            .weekday_of(date)
            .unwrap_or_else(|| calendar::weekday_index(date));
        Ok((slot, &week.days[weekday]))
    }

    /// Day `offset` days after `today`.
    pub fn day_after(&self, today: NaiveDate, offset: i64) -> Result<(usize, &Day)> {
        self.day_on(today + Duration::days(offset))
    }

    /// Named weekday of the current week.
    pub fn day_by_weekday(&self, today: NaiveDate, weekday: &str) -> Result<(usize, &Day)> {
        let index = calendar::parse_weekday(weekday)?;
        self.day_on(calendar::date_of_weekday(today, index))
    }

    pub fn current_week(&self, today: NaiveDate) -> Result<(usize, &Week)> {
        let slot = self.week_index_on(today)?;
        Ok((slot, &self.weeks[slot]))
    }

    pub fn next_week(&self, today: NaiveDate) -> Result<(usize, &Week)> {
        self.current_week(today + Duration::days(7))
    }
}
