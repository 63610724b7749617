use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

use crate::season::SeasonYears;

// ── Season directory ───────────────────────────────────────────────

/// A top-level `YYYY-YYYY` directory under the results root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonDir {
    pub name: String,
    pub years: SeasonYears,
    pub path: PathBuf,
}

// ── Tournament folder ──────────────────────────────────────────────

/// A tournament directory inside a season and the round files found in it.
///
/// All paths are relative to the results root and `/`-separated, so the
/// manifest reads the same on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentFolder {
    pub name: String,
    pub relative_path: String,
    pub entries_file: Option<String>,
    pub prelim_files: Vec<String>,
    pub elim_files: Vec<String>,
}

impl TournamentFolder {
    pub fn new(name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            entries_file: None,
            prelim_files: Vec::new(),
            elim_files: Vec::new(),
        }
    }
}

// ── Binding ────────────────────────────────────────────────────────

/// A tournament folder with the date its reference entry resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentDateBinding {
    pub folder: TournamentFolder,
    pub resolved_date: Option<NaiveDate>,
    pub raw_date: Option<String>,
}

impl TournamentDateBinding {
    pub fn dated(folder: TournamentFolder, date: NaiveDate, raw_date: impl Into<String>) -> Self {
        Self {
            folder,
            resolved_date: Some(date),
            raw_date: Some(raw_date.into()),
        }
    }

    pub fn undated(folder: TournamentFolder) -> Self {
        Self {
            folder,
            resolved_date: None,
            raw_date: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.folder.name
    }

    /// Convert to the serializable manifest form.
    pub fn to_entry(&self) -> manifest_types::TournamentEntry {
        manifest_types::TournamentEntry {
            name: self.folder.name.clone(),
            path: self.folder.relative_path.clone(),
            date: self
                .resolved_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            raw_date: self.raw_date.clone(),
            entries: self.folder.entries_file.clone(),
            prelims: self.folder.prelim_files.clone(),
            elims: self.folder.elim_files.clone(),
        }
    }
}
