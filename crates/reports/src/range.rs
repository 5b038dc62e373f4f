use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting window ending on (and including) an `as_of` date.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRange {
    #[default]
    #[serde(rename = "7days")]
    LastWeek,
    #[serde(rename = "30days")]
    LastMonth,
    #[serde(rename = "3months")]
    LastQuarter,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        match self {
            DateRange::LastWeek => 7,
            DateRange::LastMonth => 30,
            DateRange::LastQuarter => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::LastWeek => "7days",
            DateRange::LastMonth => "30days",
            DateRange::LastQuarter => "3months",
        }
    }

    /// First day of the window.
    pub fn start(&self, as_of: NaiveDate) -> NaiveDate {
        as_of - Duration::days(self.days() - 1)
    }

    pub fn contains(&self, as_of: NaiveDate, date: NaiveDate) -> bool {
        date >= self.start(as_of) && date <= as_of
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRange(pub String);

impl fmt::Display for UnknownRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown range {:?}; expected 7days, 30days or 3months", self.0)
    }
}

impl std::error::Error for UnknownRange {}

impl FromStr for DateRange {
    type Err = UnknownRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(DateRange::LastWeek),
            "30days" => Ok(DateRange::LastMonth),
            "3months" => Ok(DateRange::LastQuarter),
            other => Err(UnknownRange(other.to_string())),
        }
    }
}
