mod dateparse;
mod datetable;
mod error;
mod manifest;
mod normalize;
mod ordering;
mod resolver;
mod scanner;
mod season;
mod types;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use datetable::{DateRecord, DateTable, HeaderRule};
use manifest::{BuildOptions, DEFAULT_DATES_FILE, ManifestBuilder};
use season::SeasonYears;

const DEFAULT_OUTPUT: &str = "manifest.json";

#[derive(Parser)]
#[command(
    name = "tournament_manifest",
    about = "Debate results manifest builder",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Without a subcommand, build with these arguments
    #[command(flatten)]
    build: BuildArgs,
}

#[derive(Args)]
struct BuildArgs {
    /// Results root containing YYYY-YYYY season directories
    #[arg(default_value = ".", env = "MANIFEST_ROOT")]
    root: PathBuf,
    /// Output file [default: <ROOT>/manifest.json]
    #[arg(short, long, env = "MANIFEST_OUTPUT")]
    output: Option<PathBuf>,
    /// Reference date table file name, per season and at the root
    #[arg(long, default_value = DEFAULT_DATES_FILE, env = "MANIFEST_DATES_FILE")]
    dates_file: String,
    /// Treat a first line mentioning "date" or "name" as a header
    #[arg(long)]
    lenient_header: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a results tree and write manifest.json, tournaments in date order
    Build(BuildArgs),
    /// Print a parsed reference date table as JSON
    Dates {
        /// Path to the table (CSV or TSV)
        file: PathBuf,
        /// Season used for dates without a year, e.g. 2025-2026 [default: current]
        #[arg(long)]
        season: Option<SeasonYears>,
        #[arg(long)]
        lenient_header: bool,
    },
    /// Show which reference entry a tournament name resolves to
    Resolve {
        /// Tournament folder name, e.g. "Blue Key Invitational"
        name: String,
        /// Path to the table (CSV or TSV)
        file: PathBuf,
        #[arg(long)]
        season: Option<SeasonYears>,
        #[arg(long)]
        lenient_header: bool,
    },
}

fn header_rule(lenient: bool) -> HeaderRule {
    if lenient {
        HeaderRule::Lenient
    } else {
        HeaderRule::Strict
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Build(args)) => run_build(args),
        Some(Command::Dates {
            file,
            season,
            lenient_header,
        }) => run_dates(&file, season, header_rule(lenient_header)),
        Some(Command::Resolve {
            name,
            file,
            season,
            lenient_header,
        }) => run_resolve(&name, &file, season, header_rule(lenient_header)),
        // Default: build, honouring the same arguments and env vars
        None => run_build(cli.build),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  BUILD MODE: results tree → manifest.json
// ═══════════════════════════════════════════════════════════════════════

fn run_build(args: BuildArgs) -> anyhow::Result<()> {
    let root = args.root.as_path();
    let options = BuildOptions {
        dates_file: args.dates_file,
        header: header_rule(args.lenient_header),
    };
    eprintln!("Scanning results at: {}", root.display());

    let manifest = ManifestBuilder::new(root, options)
        .build()
        .with_context(|| format!("building manifest for {}", root.display()))?;

    for season in &manifest.seasons {
        let dated = season.tournaments.iter().filter(|t| t.is_dated()).count();
        eprintln!("\n══════════════════════════════════════════");
        eprintln!(
            "  {} ({}/{} tournaments dated from {})",
            season.name,
            dated,
            season.tournaments.len(),
            season.date_table.as_deref().unwrap_or("nowhere")
        );
        eprintln!("══════════════════════════════════════════");
        for t in &season.tournaments {
            let rounds = t.round_count();
            match (&t.date, &t.raw_date) {
                (Some(date), Some(raw)) => {
                    eprintln!("  {date}  {} ← {raw} [{rounds} rounds]", t.name)
                }
                _ => eprintln!("  ----------  {} (no date found) [{rounds} rounds]", t.name),
            }
        }
    }

    // ── Unmatched summary ──────────────────────────────────────────
    let unmatched: Vec<(&str, &str)> = manifest
        .seasons
        .iter()
        .flat_map(|s| s.unmatched.iter().map(move |t| (s.name.as_str(), t.as_str())))
        .collect();
    if !unmatched.is_empty() {
        eprintln!("\n══════════════════════════════════════════");
        eprintln!("  UNMATCHED TOURNAMENTS ({} total)", unmatched.len());
        eprintln!("══════════════════════════════════════════");
        for (season, name) in &unmatched {
            eprintln!("  {season}/{name}");
        }
    }

    let output = args.output.unwrap_or_else(|| root.join(DEFAULT_OUTPUT));
    let bytes = manifest::write_manifest(&output, &manifest)
        .with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "\nDone. {} seasons, {} tournaments → {} ({} bytes)",
        manifest.seasons.len(),
        manifest.tournament_count(),
        output.display(),
        bytes
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  DATES MODE: dump a parsed reference table
// ═══════════════════════════════════════════════════════════════════════

#[derive(serde::Serialize)]
struct TableRow<'a> {
    key: &'a str,
    #[serde(flatten)]
    record: &'a DateRecord,
}

fn load_table(file: &Path, season: Option<SeasonYears>, header: HeaderRule) -> DateTable {
    let season = season.unwrap_or_else(SeasonYears::current);
    eprintln!("Reading {} for season {season}", file.display());
    DateTable::load(file, season, header)
}

fn run_dates(file: &Path, season: Option<SeasonYears>, header: HeaderRule) -> anyhow::Result<()> {
    let table = load_table(file, season, header);
    let rows: Vec<TableRow> = table
        .iter()
        .map(|(key, record)| TableRow { key, record })
        .collect();

    eprintln!("{} dated entries", rows.len());
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  RESOLVE MODE: explain a single match
// ═══════════════════════════════════════════════════════════════════════

fn run_resolve(
    name: &str,
    file: &Path,
    season: Option<SeasonYears>,
    header: HeaderRule,
) -> anyhow::Result<()> {
    let table = load_table(file, season, header);

    #[derive(serde::Serialize)]
    struct ResolveResult<'a> {
        query: &'a str,
        key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tier: Option<resolver::MatchTier>,
        #[serde(skip_serializing_if = "Option::is_none")]
        record: Option<&'a DateRecord>,
    }

    let matched = resolver::resolve_with_tier(name, &table);
    if matched.is_none() {
        eprintln!("No date found for: {name}");
    }

    let result = ResolveResult {
        query: name,
        key: normalize::normalize(name),
        tier: matched.map(|(_, tier)| tier),
        record: matched.map(|(record, _)| record),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
