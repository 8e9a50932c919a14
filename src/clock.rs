//! Source of "today" for callers of the scheduler.

use crate::database::db;
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// Local calendar date
    #[default]
    System,
    /// Date stored in the database, moved forward by hand
    Simulated,
}

impl FromStr for ClockMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "simulated" => Ok(Self::Simulated),
            other => Err(Error::invalid(format!("unknown clock mode '{}'", other))),
        }
    }
}

pub fn today(mode: ClockMode, conn: &Connection) -> Result<NaiveDate> {
    match mode {
        ClockMode::System => Ok(Local::now().date_naive()),
        ClockMode::Simulated => db::get_current_date(conn),
    }
}
