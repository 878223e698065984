// src/models/mod.rs

//! Domain models for the schedule scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entity;
mod lookup;
mod schedule;

// Re-export all public types
pub use config::{Config, HttpConfig, LoggingConfig, SourcesConfig};
pub use entity::EntityKind;
pub use schedule::{
    DAYS_PER_WEEK, DateRange, Day, LESSONS_PER_DAY, Lesson, LessonType, Period, Schedule,
    SubLesson, Week,
};
