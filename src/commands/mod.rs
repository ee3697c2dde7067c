//! CLI command handlers.

mod check;
mod config;
mod pick;
mod topic;

use chrono::{Local, NaiveDate};

pub use check::run_check_command;
pub use config::run_config_show_command;
pub use pick::run_pick_command;
pub use topic::run_topic_command;

/// The run date: `--date` when given, otherwise the local calendar date.
fn run_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
