// src/error.rs

//! Unified error handling for the schedule scraper.

use std::fmt;

use thiserror::Error;

/// Result type alias for schedule operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("status code error: {code} {reason}")]
    Status { code: u16, reason: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// No directory page lists the requested group or teacher
    #[error("schedule object not found: {name}")]
    NotFound { name: String },

    /// The directory link leads to another object's schedule
    #[error("mismatch between schedule objects: {expected} != {found}")]
    LinkMismatch { expected: String, found: String },

    /// The schedule exists but the requested part is empty
    #[error("the schedule is missing or not published: {name}, {}", describe_slot(.week, .weekday))]
    UnavailableSchedule {
        name: String,
        week: Option<usize>,
        weekday: Option<usize>,
    },

    /// Date does not match "dd.mm" or lies outside the current semester
    #[error("incorrect date: {date}")]
    IncorrectDate { date: String },

    /// Unknown weekday name
    #[error("incorrect weekday: {weekday}")]
    IncorrectWeekday { weekday: String },

    /// Week slot outside {0, 1}
    #[error("incorrect value of the school week number: {week}")]
    IncorrectWeekNumber { week: usize },

    /// No week of the schedule covers the date
    #[error("date {date} is outside the published schedule (teaching week {week_number})")]
    OutOfRange { date: String, week_number: i64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

fn describe_slot(week: &Option<usize>, weekday: &Option<usize>) -> String {
    match (*week, *weekday) {
        (None, _) => "whole schedule".to_string(),
        (Some(week), None) => format!("week number is {week}"),
        (Some(week), Some(day)) => format!("week number is {week}, weekday {day}"),
    }
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for a group or teacher.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an unavailable-schedule error. `None` stands for the whole
    /// schedule (week) or the whole week (weekday).
    pub fn unavailable(name: impl Into<String>, week: Option<usize>, weekday: Option<usize>) -> Self {
        Self::UnavailableSchedule {
            name: name.into(),
            week,
            weekday,
        }
    }

    /// Create an incorrect-date error.
    pub fn incorrect_date(date: impl Into<String>) -> Self {
        Self::IncorrectDate { date: date.into() }
    }
}
