//! Reference date tables: `<date text>,<tournament name>` rows.
//!
//! Real data examples:
//!
//!   Date,Name
//!   "September 12-13, 2025",Grapevine Classic
//!   "Oct 31-Nov 2, 2025",Glenbrooks
//!
//! or the same thing tab-separated, as pasted out of a spreadsheet.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::dateparse::parse_start_date;
use crate::normalize::normalize;
use crate::season::SeasonYears;

/// One row of a reference table whose date parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRecord {
    pub original_name: String,
    pub resolved_date: NaiveDate,
    pub raw_date: String,
}

/// How to recognise a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderRule {
    /// First line mentions both "date" and "name".
    #[default]
    Strict,
    /// First line mentions "date" or "name".
    Lenient,
}

impl HeaderRule {
    fn is_header(self, line: &str) -> bool {
        let lower = line.to_lowercase();
        let (date, name) = (lower.contains("date"), lower.contains("name"));
        match self {
            Self::Strict => date && name,
            Self::Lenient => date || name,
        }
    }
}

// ── Lookup table ─────────────────────────────────────────────────────

/// Normalized tournament name → date record, in table order.
///
/// Order matters: substring matching takes the first entry that fits, so
/// this is a list rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTable {
    entries: Vec<(String, DateRecord)>,
}

impl DateTable {
    /// Parse the text of a reference table.
    pub fn parse(content: &str, season: SeasonYears, header: HeaderRule) -> Self {
        let mut table = Self::default();
        let Some(first) = content.lines().next() else {
            return table;
        };
        let delimiter = if first.contains('\t') { '\t' } else { ',' };

        for (line_no, line) in data_lines(content, header) {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_row(line, delimiter);
            if fields.len() < 2 {
                debug!(line_no, line, "skipping row with fewer than 2 columns");
                continue;
            }
            let (raw_date, name) = (fields[0].as_str(), fields[1].as_str());
            if is_blank_cell(raw_date) || is_blank_cell(name) {
                debug!(line_no, line, "skipping row with empty date or name");
                continue;
            }

            match parse_start_date(raw_date, season) {
                Some(date) => table.insert(DateRecord {
                    original_name: name.to_string(),
                    resolved_date: date,
                    raw_date: raw_date.to_string(),
                }),
                None => debug!(name, raw_date, "unparseable date, row dropped"),
            }
        }

        table
    }

    /// Read and parse a reference table file. A missing or unreadable
    /// file gives an empty table.
    pub fn load(path: &Path, season: SeasonYears, header: HeaderRule) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let table = Self::parse(&content, season, header);
                debug!(path = %path.display(), entries = table.len(), "loaded date table");
                table
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "date table unavailable, continuing without dates");
                Self::default()
            }
        }
    }

    /// Insert under the record's normalized name. A repeated key replaces
    /// the earlier record but keeps its position.
    pub fn insert(&mut self, record: DateRecord) {
        let key = normalize(&record.original_name);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                debug!(
                    key = %key,
                    old = %existing.raw_date,
                    new = %record.raw_date,
                    "duplicate tournament name, later row wins"
                );
                *existing = record;
            }
            None => self.entries.push((key, record)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DateRecord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DateRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lines after the header, paired with their 1-based line number in the
/// file.
fn data_lines(content: &str, header: HeaderRule) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(move |&(line_no, l)| line_no > 1 || !header.is_header(l))
}

fn is_blank_cell(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("nan")
}

/// Split one row. Tabs split plainly; commas honour double quotes, which
/// toggle in and out of quoting and are dropped from the field.
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    if delimiter != ',' {
        return line.split(delimiter).map(|f| f.trim().to_string()).collect();
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season() -> SeasonYears {
        SeasonYears::new(2025)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── split_row ────────────────────────────────────────────────────

    #[test]
    fn test_split_row_quoted_comma() {
        assert_eq!(
            split_row(r#""August 22-23, 2025",Grapevine Classic"#, ','),
            vec!["August 22-23, 2025", "Grapevine Classic"]
        );
    }

    #[test]
    fn test_split_row_tab() {
        assert_eq!(
            split_row("Sept. 5-6\t Greenhill \textra", '\t'),
            vec!["Sept. 5-6", "Greenhill", "extra"]
        );
    }

    #[test]
    fn test_split_row_trailing_delimiter() {
        assert_eq!(split_row("a,b,", ','), vec!["a", "b", ""]);
    }

    // ── Header detection ─────────────────────────────────────────────

    #[test]
    fn test_header_rules() {
        assert!(HeaderRule::Strict.is_header("Date,Tournament Name"));
        assert!(!HeaderRule::Strict.is_header("Date,Event"));
        assert!(HeaderRule::Lenient.is_header("Date,Event"));
        assert!(!HeaderRule::Lenient.is_header("Sept 5,Greenhill"));
        // plain substring test: "tournament" contains "name"
        assert!(HeaderRule::Strict.is_header("Date,Tournament"));
    }

    #[test]
    fn test_lenient_header_drops_first_tournament_row() {
        let content = "\"Sept 5, 2025\",Greenhill Tournament\n\
                       \"Oct 3, 2025\",Heart of Texas\n";
        let lenient = DateTable::parse(content, season(), HeaderRule::Lenient);
        assert_eq!(lenient.len(), 1);
        assert!(lenient.get("greenhilltournament").is_none());
        assert!(lenient.get("heartoftexas").is_some());

        let strict = DateTable::parse(content, season(), HeaderRule::Strict);
        assert_eq!(strict.len(), 2);
    }

    #[test]
    fn test_data_lines_keep_file_line_numbers() {
        let content = "Date,Name\n\"Sept 5, 2025\",Greenhill\n\nbad row\n";
        let lines: Vec<(usize, &str)> = data_lines(content, HeaderRule::Strict).collect();
        assert_eq!(
            lines,
            vec![(2, "\"Sept 5, 2025\",Greenhill"), (3, ""), (4, "bad row")]
        );

        let no_header = "\"Sept 5, 2025\",Greenhill\n";
        let lines: Vec<(usize, &str)> = data_lines(no_header, HeaderRule::Strict).collect();
        assert_eq!(lines[0].0, 1);
    }

    // ── parse ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_comma_table_with_header() {
        let content = "Date,Name\n\
                       \"August 22-23, 2025\",Grapevine Classic\n\
                       \"January 30-February 1, 2026\",Blue Key\n";
        let table = DateTable::parse(content, season(), HeaderRule::Strict);
        assert_eq!(table.len(), 2);

        let rec = table.get("bluekey").unwrap();
        assert_eq!(rec.original_name, "Blue Key");
        assert_eq!(rec.resolved_date, ymd(2026, 1, 30));
        assert_eq!(rec.raw_date, "January 30-February 1, 2026");
    }

    #[test]
    fn test_parse_tab_table_without_header() {
        let content = "Sept. 5-6\tGreenhill Fall Classic\nMarch 7-9\tState Championship\n";
        let table = DateTable::parse(content, season(), HeaderRule::Strict);
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["greenhillfallclassic", "statechampionship"]);
        assert_eq!(
            table.get("statechampionship").unwrap().resolved_date,
            ymd(2026, 3, 7)
        );
    }

    #[test]
    fn test_parse_skips_malformed_and_unparseable_rows() {
        let content = "\"Oct 3-4, 2025\",Heart of Texas\n\
                       only one column\n\
                       nan,Ghost Invitational\n\
                       \"Nov 1, 2025\",NaN\n\
                       \n\
                       TBD,Someday Open\n\
                       ,Empty Date\n";
        let table = DateTable::parse(content, season(), HeaderRule::Strict);
        assert_eq!(table.len(), 1);
        assert!(table.get("heartoftexas").is_some());
        assert!(table.get("somedayopen").is_none());
    }

    #[test]
    fn test_parse_duplicate_key_last_write_wins_in_place() {
        let content = "\"Sept 5, 2025\",Greenhill\n\
                       \"Oct 3, 2025\",Heart of Texas\n\
                       \"Sept 19, 2025\",GREENHILL\n";
        let table = DateTable::parse(content, season(), HeaderRule::Strict);
        assert_eq!(table.len(), 2);

        let (first_key, first) = table.iter().next().unwrap();
        assert_eq!(first_key, "greenhill");
        assert_eq!(first.resolved_date, ymd(2025, 9, 19));
        assert_eq!(first.original_name, "GREENHILL");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let content = "Date,Name\n\"Nov 7-9, 2025\",Glenbrooks\nJan 9-11,Sunvitational\n";
        let a = DateTable::parse(content, season(), HeaderRule::Strict);
        let b = DateTable::parse(content, season(), HeaderRule::Strict);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(DateTable::parse("", season(), HeaderRule::Strict).is_empty());
        assert!(DateTable::parse("Date,Name\n", season(), HeaderRule::Strict).is_empty());
    }

    // ── load ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = DateTable::load(
            &dir.path().join("tournament_dates.csv"),
            season(),
            HeaderRule::Strict,
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tournament_dates.csv");
        fs::write(&path, "date,name\n\"Feb 14-16, 2026\",Harvard\n").unwrap();
        let table = DateTable::load(&path, season(), HeaderRule::Strict);
        assert_eq!(table.get("harvard").unwrap().resolved_date, ymd(2026, 2, 14));
    }
}
