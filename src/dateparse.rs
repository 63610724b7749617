//! Free-text tournament date ranges → start date.
//!
//! Reference tables write dates the way humans do:
//!
//!   August 22-23, 2025
//!   January 30-February 1, 2026
//!   Sept. 5-6
//!   January 17-19, 2026 (tentative)
//!
//! Only the first day of the range matters for ordering, so the parser
//! looks for the earliest month word and the day number attached to it.
//! Missing years are filled in from the season the table belongs to.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::season::SeasonYears;

// ── Month vocabulary ─────────────────────────────────────────────────

/// A spelling of a month name, mapped to its 0-based index.
pub struct MonthName {
    pub name: &'static str,
    pub month0: u32,
}

/// Every month spelling the parser accepts, lowercase.
///
/// Matched against whole words only. Misspellings seen in real
/// reference tables go at the end of their month's block.
pub static MONTH_NAMES: &[MonthName] = &[
    MonthName { name: "january", month0: 0 },
    MonthName { name: "jan", month0: 0 },
    MonthName { name: "february", month0: 1 },
    MonthName { name: "feb", month0: 1 },
    MonthName { name: "march", month0: 2 },
    MonthName { name: "mar", month0: 2 },
    MonthName { name: "april", month0: 3 },
    MonthName { name: "apr", month0: 3 },
    MonthName { name: "may", month0: 4 },
    MonthName { name: "june", month0: 5 },
    MonthName { name: "jun", month0: 5 },
    MonthName { name: "july", month0: 6 },
    MonthName { name: "jul", month0: 6 },
    MonthName { name: "august", month0: 7 },
    MonthName { name: "aug", month0: 7 },
    MonthName { name: "september", month0: 8 },
    MonthName { name: "sept", month0: 8 },
    MonthName { name: "sep", month0: 8 },
    MonthName { name: "septmber", month0: 8 },
    MonthName { name: "october", month0: 9 },
    MonthName { name: "oct", month0: 9 },
    MonthName { name: "november", month0: 10 },
    MonthName { name: "nov", month0: 10 },
    MonthName { name: "december", month0: 11 },
    MonthName { name: "dec", month0: 11 },
];

fn month_index(word: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .find(|m| m.name == word)
        .map(|m| m.month0)
}

// ── Regex patterns ─────────────────────────────────────────────────

static RE_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"20\d\d").unwrap());

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]+").unwrap());

// A day number glued to the word before it: "january 30", "sept. 5".
// The trailing class keeps "march 2026" from reading as day 20.
static RE_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+\.?\s*(\d{1,2})(?:\D|$)").unwrap());

// ── Parsing ──────────────────────────────────────────────────────────

/// Parse a date-range expression into the date the range starts on.
///
/// Returns `None` for blank or `nan` cells and for text with no month
/// word or no day number. When the text carries no `20xx` year, the year
/// comes from `season`.
pub fn parse_start_date(text: &str, season: SeasonYears) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }

    let cleaned = RE_PARENTHETICAL.replace_all(trimmed, "").to_lowercase();

    let year = RE_YEAR
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let Some((month_pos, month0)) = find_start_month(&cleaned) else {
        debug!(text, "no month name in date text");
        return None;
    };

    let Some(day) = find_day(&cleaned[month_pos..]) else {
        debug!(text, "no day number after month name");
        return None;
    };

    let year = year.unwrap_or_else(|| season.year_for_month(month0));
    let date = calendar_date(year, month0, day);
    if date.is_none() {
        debug!(text, year, month0, day, "date out of calendar range");
    }
    date
}

/// Byte offset and 0-based index of the earliest month word.
///
/// In a cross-month range the first month is where the range starts.
fn find_start_month(lower: &str) -> Option<(usize, u32)> {
    RE_WORD
        .find_iter(lower)
        .find_map(|w| month_index(w.as_str()).map(|m| (w.start(), m)))
}

/// First day number directly following a run of letters.
fn find_day(from_month: &str) -> Option<u32> {
    RE_DAY
        .captures(from_month)
        .and_then(|caps| caps[1].parse().ok())
}

/// Build a date by counting days from the first of the month, so a day
/// past the month's end rolls into the next month and day 0 is the last
/// day of the previous one.
fn calendar_date(year: i32, month0: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    match day {
        0 => first.checked_sub_days(Days::new(1)),
        d => first.checked_add_days(Days::new(u64::from(d - 1))),
    }
}
