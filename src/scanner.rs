use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ManifestError, Result};
use crate::season::SeasonYears;
use crate::types::{SeasonDir, TournamentFolder};

/// Elimination bracket stages, earliest round first. Matched as substrings
/// of the lowercased file name ("doubles", "octas", "quarterfinals", ...).
const ELIM_STAGES: &[&str] = &["double", "octo", "octa", "quarter", "semi", "final"];

static RE_FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// What a CSV inside a tournament folder holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundFileKind {
    Entries,
    Prelim,
    Elim,
}

impl RoundFileKind {
    /// Classify by file name. `None` for CSVs that are not round results.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        // "prelims" contains "elim", so it is checked first
        if lower.contains("entries") || lower.contains("entry") {
            Some(Self::Entries)
        } else if lower.contains("prelim") {
            Some(Self::Prelim)
        } else if lower.contains("elim") || ELIM_STAGES.iter().any(|s| lower.contains(s)) {
            Some(Self::Elim)
        } else if lower.contains("round") {
            Some(Self::Prelim)
        } else {
            None
        }
    }
}

/// Scan the results root for season directories.
///
/// Expected directory layout:
///   {root}/{YYYY-YYYY}/{tournament}/**/*.csv
///
/// Anything at the top level that is not a season (the root date table,
/// the manifest itself, stray folders) is skipped.
pub fn scan_seasons(root: &Path) -> Result<Vec<SeasonDir>> {
    if !root.is_dir() {
        return Err(ManifestError::RootNotFound(root.to_path_buf()));
    }
    let read = std::fs::read_dir(root).map_err(|source| ManifestError::Read {
        path: root.to_path_buf(),
        source,
    })?;

    let mut seasons: Vec<SeasonDir> = read
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            let years = SeasonYears::from_dir_name(&name)?;
            Some(SeasonDir {
                name,
                years,
                path: e.path(),
            })
        })
        .collect();

    seasons.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(seasons)
}

/// Discover the tournament folders of one season, sorted by name.
///
/// `skip_file` names the reference date table so it is never mistaken
/// for round results.
pub fn scan_tournaments(
    root: &Path,
    season: &SeasonDir,
    skip_file: &str,
) -> Vec<TournamentFolder> {
    let mut folders = Vec::new();

    for entry in std::fs::read_dir(&season.path).into_iter().flatten() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let name = match dir.file_name().and_then(|n| n.to_str()) {
            Some(n) if !n.starts_with('.') => n.to_string(),
            _ => continue,
        };

        let mut folder = TournamentFolder::new(name, relative_path(root, &dir));
        let mut entries_candidates = Vec::new();

        for file_entry in WalkDir::new(&dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = file_entry.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if file_name.eq_ignore_ascii_case(skip_file) {
                continue;
            }

            let rel = relative_path(root, path);
            match RoundFileKind::from_file_name(file_name) {
                Some(RoundFileKind::Entries) => entries_candidates.push(rel),
                Some(RoundFileKind::Prelim) => folder.prelim_files.push(rel),
                Some(RoundFileKind::Elim) => folder.elim_files.push(rel),
                None => debug!(file = %rel, "unrecognised CSV, not a round file"),
            }
        }

        entries_candidates.sort();
        folder.entries_file = entries_candidates.into_iter().next();
        folder.prelim_files.sort_by(|a, b| compare_prelims(a, b));
        folder.elim_files.sort_by(|a, b| compare_elims(a, b));

        folders.push(folder);
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    folders
}

/// Path relative to `root`, always with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_lowercase()
}

/// "Round 2" before "Round 10": first embedded number, then name.
fn compare_prelims(a: &str, b: &str) -> Ordering {
    let (fa, fb) = (file_name_of(a), file_name_of(b));
    let num = |s: &str| {
        RE_FIRST_NUMBER
            .find(s)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(u32::MAX)
    };
    num(&fa).cmp(&num(&fb)).then_with(|| a.cmp(b))
}

/// Bracket order: doubles, octos, quarters, semis, finals, then name.
fn compare_elims(a: &str, b: &str) -> Ordering {
    let stage = |s: &str| {
        let name = file_name_of(s);
        // "semifinals" contains "final"; the first listed stage wins
        ELIM_STAGES
            .iter()
            .position(|st| name.contains(st))
            .unwrap_or(ELIM_STAGES.len())
    };
    stage(a).cmp(&stage(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    // ── RoundFileKind ────────────────────────────────────────────────

    #[test]
    fn test_classify_file_names() {
        use RoundFileKind::*;
        assert_eq!(RoundFileKind::from_file_name("Entries.csv"), Some(Entries));
        assert_eq!(RoundFileKind::from_file_name("Round 1.csv"), Some(Prelim));
        assert_eq!(RoundFileKind::from_file_name("prelims_r3.csv"), Some(Prelim));
        assert_eq!(RoundFileKind::from_file_name("Elims Octos.csv"), Some(Elim));
        assert_eq!(RoundFileKind::from_file_name("Quarterfinals.csv"), Some(Elim));
        assert_eq!(RoundFileKind::from_file_name("Finals.csv"), Some(Elim));
        assert_eq!(RoundFileKind::from_file_name("judges.csv"), None);
    }

    // ── Ordering ─────────────────────────────────────────────────────

    #[test]
    fn test_prelims_numeric_order() {
        let mut files = vec![
            "s/t/Round 10.csv".to_string(),
            "s/t/Round 2.csv".to_string(),
            "s/t/Round 1.csv".to_string(),
        ];
        files.sort_by(|a, b| compare_prelims(a, b));
        assert_eq!(
            files,
            vec!["s/t/Round 1.csv", "s/t/Round 2.csv", "s/t/Round 10.csv"]
        );
    }

    #[test]
    fn test_elims_bracket_order() {
        let mut files = vec![
            "s/t/Finals.csv".to_string(),
            "s/t/Semifinals.csv".to_string(),
            "s/t/Octafinals.csv".to_string(),
            "s/t/Quarterfinals.csv".to_string(),
            "s/t/Double Octos.csv".to_string(),
        ];
        files.sort_by(|a, b| compare_elims(a, b));
        assert_eq!(
            files,
            vec![
                "s/t/Double Octos.csv",
                "s/t/Octafinals.csv",
                "s/t/Quarterfinals.csv",
                "s/t/Semifinals.csv",
                "s/t/Finals.csv",
            ]
        );
    }

    // ── Filesystem scans ─────────────────────────────────────────────

    #[test]
    fn test_scan_seasons_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2025-2026")).unwrap();
        fs::create_dir_all(root.join("2024-2025")).unwrap();
        fs::create_dir_all(root.join("misc")).unwrap();
        touch(&root.join("tournament_dates.csv"));

        let seasons = scan_seasons(root).unwrap();
        let names: Vec<&str> = seasons.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["2024-2025", "2025-2026"]);
        assert_eq!(seasons[1].years, SeasonYears::new(2025));
    }

    #[test]
    fn test_scan_seasons_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_seasons(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ManifestError::RootNotFound(_)));
    }

    #[test]
    fn test_scan_tournaments_classifies_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let season_path = root.join("2025-2026");
        let t = season_path.join("Blue Key");
        touch(&t.join("Entries.csv"));
        touch(&t.join("Round 2.csv"));
        touch(&t.join("Round 1.csv"));
        touch(&t.join("elims/Semis.csv"));
        touch(&t.join("elims/Finals.csv"));
        touch(&t.join("notes.txt"));
        touch(&season_path.join("Glenbrooks/Round 1.csv"));
        touch(&season_path.join(".hidden/Round 1.csv"));
        touch(&season_path.join("tournament_dates.csv"));

        let season = SeasonDir {
            name: "2025-2026".into(),
            years: SeasonYears::new(2025),
            path: season_path,
        };
        let folders = scan_tournaments(root, &season, "tournament_dates.csv");
        assert_eq!(folders.len(), 2);

        let blue_key = &folders[0];
        assert_eq!(blue_key.name, "Blue Key");
        assert_eq!(blue_key.relative_path, "2025-2026/Blue Key");
        assert_eq!(
            blue_key.entries_file.as_deref(),
            Some("2025-2026/Blue Key/Entries.csv")
        );
        assert_eq!(
            blue_key.prelim_files,
            vec!["2025-2026/Blue Key/Round 1.csv", "2025-2026/Blue Key/Round 2.csv"]
        );
        assert_eq!(
            blue_key.elim_files,
            vec![
                "2025-2026/Blue Key/elims/Semis.csv",
                "2025-2026/Blue Key/elims/Finals.csv"
            ]
        );

        assert_eq!(folders[1].name, "Glenbrooks");
        assert_eq!(folders[1].entries_file, None);
    }
}
