use std::fs;
use std::path::{Path, PathBuf};

use manifest_types::{Manifest, SeasonManifest};
use tracing::{debug, info, warn};

use crate::datetable::{DateTable, HeaderRule};
use crate::error::{ManifestError, Result};
use crate::ordering::sort_bindings;
use crate::resolver::resolve;
use crate::scanner::{scan_seasons, scan_tournaments};
use crate::types::{SeasonDir, TournamentDateBinding, TournamentFolder};

pub const DEFAULT_DATES_FILE: &str = "tournament_dates.csv";

/// Knobs for a manifest build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// File name of the reference date table, looked up in each season
    /// directory and then in the root
    pub dates_file: String,
    pub header: HeaderRule,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            dates_file: DEFAULT_DATES_FILE.to_string(),
            header: HeaderRule::default(),
        }
    }
}

/// Where a season's dates came from.
enum TableSource {
    Season(PathBuf),
    Root(PathBuf),
    Missing,
}

/// Builds the manifest for one results root.
pub struct ManifestBuilder {
    root: PathBuf,
    options: BuildOptions,
    /// Root-level table text, read once. Parsed per season because
    /// year inference depends on the season.
    root_table: Option<String>,
}

impl ManifestBuilder {
    pub fn new(root: impl Into<PathBuf>, options: BuildOptions) -> Self {
        let root = root.into();
        let root_table_path = root.join(&options.dates_file);
        let root_table = match fs::read_to_string(&root_table_path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(path = %root_table_path.display(), error = %e, "no root date table");
                None
            }
        };
        Self {
            root,
            options,
            root_table,
        }
    }

    pub fn build(&self) -> Result<Manifest> {
        let seasons = scan_seasons(&self.root)?;
        info!(root = %self.root.display(), seasons = seasons.len(), "scanning results");

        let seasons = seasons.iter().map(|s| self.build_season(s)).collect();
        Ok(Manifest {
            root: self.root.display().to_string(),
            seasons,
        })
    }

    /// Resolve, bind and order one season's tournaments.
    pub fn build_season(&self, season: &SeasonDir) -> SeasonManifest {
        let (table, source) = self.season_table(season);
        let folders = scan_tournaments(&self.root, season, &self.options.dates_file);
        info!(
            season = %season.name,
            tournaments = folders.len(),
            table_entries = table.len(),
            "building season"
        );

        let bindings: Vec<TournamentDateBinding> =
            folders.into_iter().map(|f| bind(f, &table)).collect();

        let unmatched: Vec<String> = bindings
            .iter()
            .filter(|b| b.resolved_date.is_none())
            .map(|b| b.name().to_string())
            .collect();

        let date_table = match &source {
            TableSource::Season(p) | TableSource::Root(p) => Some(self.relative(p)),
            TableSource::Missing => None,
        };

        SeasonManifest {
            name: season.name.clone(),
            start_year: season.years.start_year,
            end_year: season.years.end_year,
            date_table,
            tournaments: sort_bindings(bindings).iter().map(|b| b.to_entry()).collect(),
            unmatched,
        }
    }

    /// The season's own table if it has one, else the root table.
    fn season_table(&self, season: &SeasonDir) -> (DateTable, TableSource) {
        let season_path = season.path.join(&self.options.dates_file);
        if season_path.is_file() {
            let table = DateTable::load(&season_path, season.years, self.options.header);
            if table.is_empty() {
                warn!(path = %season_path.display(), "season date table has no dated rows");
            }
            return (table, TableSource::Season(season_path));
        }

        match &self.root_table {
            Some(text) => {
                debug!(season = %season.name, "no season date table, using root table");
                let table = DateTable::parse(text, season.years, self.options.header);
                (table, TableSource::Root(self.root.join(&self.options.dates_file)))
            }
            None => {
                warn!(
                    season = %season.name,
                    file = %self.options.dates_file,
                    "no date table for season, tournaments will be ordered by name"
                );
                (DateTable::default(), TableSource::Missing)
            }
        }
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn bind(folder: TournamentFolder, table: &DateTable) -> TournamentDateBinding {
    match resolve(&folder.name, table) {
        Some(record) => {
            debug!(
                tournament = %folder.name,
                matched = %record.original_name,
                "date resolved"
            );
            let date = record.resolved_date;
            let raw = record.raw_date.clone();
            TournamentDateBinding::dated(folder, date, raw)
        }
        None => {
            debug!(tournament = %folder.name, "no date found");
            TournamentDateBinding::undated(folder)
        }
    }
}

/// Write the manifest as pretty JSON.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<usize> {
    let json = serde_json::to_string_pretty(manifest)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, &json).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(json.len())
}
