use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::ManifestError;

/// First month (1-based) of a new season. Competition starts in August.
pub const SEASON_START_MONTH: u32 = 8;

// "2025-2026", "2025_2026", "2025–2026"
static RE_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{4})\s*[-_–]\s*(\d{4})\s*$").unwrap());

/// The two calendar years a season spans.
///
/// Date text without a year is placed in `start_year` when it falls in
/// August–December and in `end_year` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeasonYears {
    pub start_year: i32,
    pub end_year: i32,
}

impl SeasonYears {
    pub fn new(start_year: i32) -> Self {
        Self {
            start_year,
            end_year: start_year + 1,
        }
    }

    /// Parse a season directory name such as `2025-2026`.
    /// The end year must directly follow the start year.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let caps = RE_SEASON.captures(name)?;
        let start: i32 = caps[1].parse().ok()?;
        let end: i32 = caps[2].parse().ok()?;
        (end == start + 1).then(|| Self::new(start))
    }

    /// The season a calendar date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= SEASON_START_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    /// The season in progress today (local clock).
    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    /// Year for a month that came without one. `month0` is 0-based.
    pub fn year_for_month(&self, month0: u32) -> i32 {
        if month0 + 1 >= SEASON_START_MONTH {
            self.start_year
        } else {
            self.end_year
        }
    }
}

impl fmt::Display for SeasonYears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

impl FromStr for SeasonYears {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dir_name(s).ok_or_else(|| ManifestError::InvalidSeason(s.to_string()))
    }
}
