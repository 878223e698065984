//! Service layer.
//!
//! - Directory lookups (`DirectoryResolver`)
//! - Schedule retrieval and queries (`ScheduleService`)

mod directory;
mod schedules;

pub use directory::{DirectoryEntry, DirectoryResolver, ResolvedPage, parse_directory};
pub use schedules::{DayQuery, DayReport, ScheduleService};
