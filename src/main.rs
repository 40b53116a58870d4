use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use pbp_drives::config::IngestConfig;
use pbp_drives::{drives_store, ingest};

const DEFAULT_FIRST_SEASON: i32 = 2009;
const DEFAULT_LAST_SEASON: i32 = 2018;

fn main() -> Result<()> {
    init_tracing();

    let mut config = IngestConfig::from_env();
    if let Some(out) = arg_value("--out") {
        config.output_dir = PathBuf::from(out);
    }
    if std::env::args().skip(1).any(|a| a == "--only-new") {
        config.only_new_games = true;
    }
    let season_years = match arg_value("--years") {
        Some(raw) => parse_season_years(&raw),
        None => (DEFAULT_FIRST_SEASON..=DEFAULT_LAST_SEASON).collect(),
    };
    if season_years.is_empty() {
        return Err(anyhow!("no season years resolved for ingest"));
    }

    let rules = config.load_rules()?;
    let db_path = arg_value("--db")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.default_db_path());
    let mut conn = drives_store::open_db(&db_path).context("unable to open drives store")?;

    let summary =
        ingest::ingest_seasons(&config, &rules, &mut conn, db_path.clone(), &season_years)?;

    println!("Drive ingest complete");
    println!("DB: {}", summary.db_path.display());
    println!("Output: {}", config.output_dir.display());
    println!(
        "Games built: {} (failed {})",
        summary.games_built(),
        summary.games_failed()
    );
    for season in &summary.seasons {
        println!(
            "season {}: games {}/{} (scheduled {}, already stored {}) repaired={} mismatched={} warnings={} drive_rows={}",
            season.season_year,
            season.games_built,
            season.games_selected,
            season.games_scheduled,
            season.games_already_stored,
            season.games_repaired,
            season.games_mismatched,
            season.warnings,
            season.parquet_rows
        );
        if !season.errors.is_empty() {
            println!("  errors: {}", season.errors.len());
            for err in season.errors.iter().take(6) {
                println!("   - {err}");
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

/// `2009-2018` (inclusive), `2012,2015`, or a mix of both.
fn parse_season_years(raw: &str) -> Vec<i32> {
    let mut out = Vec::new();
    for part in raw.split([',', ';', ' ']).map(str::trim).filter(|p| !p.is_empty()) {
        let years = match part.split_once('-') {
            Some((start, end)) => match (start.trim().parse::<i32>(), end.trim().parse::<i32>()) {
                (Ok(start), Ok(end)) if start <= end => (start..=end).collect::<Vec<_>>(),
                _ => Vec::new(),
            },
            None => part.parse::<i32>().ok().into_iter().collect(),
        };
        for year in years {
            if !out.contains(&year) {
                out.push(year);
            }
        }
    }
    out
}
