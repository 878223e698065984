// src/lib.rs

//! UlSTU schedule scraper library
//!
//! Finds a group's or teacher's timetable page, parses its positional
//! `<p>` table into a two-week [`models::Schedule`] and renders days and
//! weeks as text.

pub mod calendar;
pub mod error;
pub mod format;
pub mod models;
pub mod parser;
pub mod services;
pub mod utils;
