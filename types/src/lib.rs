use serde::{Deserialize, Serialize};

// ── Tournament entry ─────────────────────────────────────────────────────

/// One tournament folder as it appears in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentEntry {
    pub name: String,
    /// Folder path relative to the results root, `/`-separated
    pub path: String,
    /// ISO `YYYY-MM-DD` start date, if one was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Date text exactly as written in the reference table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<String>,
    #[serde(default)]
    pub prelims: Vec<String>,
    #[serde(default)]
    pub elims: Vec<String>,
}

impl TournamentEntry {
    pub fn is_dated(&self) -> bool {
        self.date.is_some()
    }

    /// Number of round result files (prelims + elims).
    pub fn round_count(&self) -> usize {
        self.prelims.len() + self.elims.len()
    }
}

// ── Season ───────────────────────────────────────────────────────────────

/// A season directory, tournaments in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonManifest {
    pub name: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Reference table the dates came from, relative to the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_table: Option<String>,
    pub tournaments: Vec<TournamentEntry>,
    /// Tournament names no reference entry matched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}

// ── JSON output format ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub root: String,
    pub seasons: Vec<SeasonManifest>,
}

impl Manifest {
    pub fn season(&self, name: &str) -> Option<&SeasonManifest> {
        self.seasons.iter().find(|s| s.name == name)
    }

    pub fn tournament_count(&self) -> usize {
        self.seasons.iter().map(|s| s.tournaments.len()).sum()
    }
}
