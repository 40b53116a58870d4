use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use reqwest::blocking::Client;
use rusqlite::Connection;

use crate::boxscore_fetch::{BoxscoreFeed, fetch_boxscore};
use crate::config::IngestConfig;
use crate::drives_export::{
    season_json_path, season_parquet_path, write_drives_parquet, write_json_lines,
};
use crate::drives_store::{
    begin_ingest_run, finish_ingest_run, load_season_records, store_reports, stored_game_ids,
};
use crate::game::{GameMeta, GameReport, reconstruct_game};
use crate::http_cache::DocumentCache;
use crate::http_client::http_client;
use crate::reconcile::ReconcileOutcome;
use crate::rules::EngineRules;
use crate::schedule::{fetch_schedule, select_games};

#[derive(Debug)]
pub struct GameOutcome {
    pub meta: GameMeta,
    pub result: Result<GameReport, String>,
}

#[derive(Debug, Clone, Default)]
pub struct SeasonSummary {
    pub season_year: i32,
    pub games_scheduled: usize,
    pub games_selected: usize,
    pub games_already_stored: usize,
    pub games_built: usize,
    pub games_repaired: usize,
    pub games_mismatched: usize,
    pub warnings: usize,
    pub errors: Vec<String>,
    pub json_path: Option<PathBuf>,
    pub parquet_path: Option<PathBuf>,
    pub parquet_rows: usize,
}

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub seasons: Vec<SeasonSummary>,
}

impl IngestSummary {
    pub fn games_built(&self) -> usize {
        self.seasons.iter().map(|s| s.games_built).sum()
    }

    pub fn games_failed(&self) -> usize {
        self.seasons.iter().map(|s| s.errors.len()).sum()
    }
}

pub fn build_fetch_pool(parallelism: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.max(1))
        .build()
        .ok()
}

/// Reconstruct every game independently. A failure is kept on its own
/// outcome and never stops the others. Output order follows `metas`.
pub fn reconstruct_games<F>(
    metas: Vec<GameMeta>,
    rules: &EngineRules,
    pool: Option<&rayon::ThreadPool>,
    load: F,
) -> Vec<GameOutcome>
where
    F: Fn(&GameMeta) -> Result<BoxscoreFeed> + Sync,
{
    let run = || {
        metas
            .into_par_iter()
            .map(|meta| {
                let result = load(&meta)
                    .and_then(|feed| {
                        reconstruct_game(meta.clone(), &feed, rules).map_err(anyhow::Error::from)
                    })
                    .map_err(|err| format!("game {}: {err:#}", meta.game_id));
                GameOutcome { meta, result }
            })
            .collect::<Vec<_>>()
    };
    match pool {
        Some(pool) => pool.install(run),
        None => run(),
    }
}

pub fn summarize_outcomes(
    season_year: i32,
    games_scheduled: usize,
    outcomes: Vec<GameOutcome>,
) -> (SeasonSummary, Vec<GameReport>) {
    let mut summary = SeasonSummary {
        season_year,
        games_scheduled,
        games_selected: outcomes.len(),
        ..SeasonSummary::default()
    };
    let mut reports = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome.result {
            Ok(report) => {
                summary.games_built += 1;
                summary.warnings += report.warnings.len();
                match report.reconciliation {
                    ReconcileOutcome::Consistent => {}
                    ReconcileOutcome::Repaired { .. } => summary.games_repaired += 1,
                    ReconcileOutcome::Mismatch { .. } => summary.games_mismatched += 1,
                }
                tracing::info!(game = %report.game, status = report.reconciliation.label(), "game built");
                reports.push(report);
            }
            Err(err) => {
                tracing::warn!(game_id = %outcome.meta.game_id, "{err}");
                summary.errors.push(err);
            }
        }
    }
    (summary, reports)
}

pub fn skip_stored_games(games: Vec<GameMeta>, stored: &HashSet<String>) -> Vec<GameMeta> {
    games
        .into_iter()
        .filter(|g| !stored.contains(&g.game_id))
        .collect()
}

pub fn ingest_season(
    config: &IngestConfig,
    rules: &EngineRules,
    client: &Client,
    cache: &DocumentCache,
    pool: Option<&rayon::ThreadPool>,
    conn: &mut Connection,
    season_year: i32,
) -> Result<SeasonSummary> {
    let scheduled = fetch_schedule(client, cache, &config.feed_base_url, season_year)?;
    let games_scheduled = scheduled.len();
    let mut selected = select_games(scheduled, &config.skip_game_ids);
    let mut games_already_stored = 0;
    if config.only_new_games {
        let before = selected.len();
        selected = skip_stored_games(selected, &stored_game_ids(conn, season_year)?);
        games_already_stored = before - selected.len();
        tracing::info!(season_year, games_already_stored, "skipping stored games");
    }
    let run_id = begin_ingest_run(conn, season_year, selected.len())?;

    let outcomes = reconstruct_games(selected, rules, pool, |meta| {
        fetch_boxscore(client, cache, &config.feed_base_url, &meta.game_id)
    });
    let (mut summary, reports) = summarize_outcomes(season_year, games_scheduled, outcomes);
    summary.games_already_stored = games_already_stored;

    let stored = store_reports(conn, &reports)?;
    // Season files cover every stored game, including ones skipped this run.
    let records = load_season_records(conn, season_year)?;

    let json_path = season_json_path(&config.output_dir, season_year);
    write_json_lines(&json_path, &records)?;
    summary.json_path = Some(json_path);

    let parquet_path = season_parquet_path(&config.output_dir, season_year);
    summary.parquet_rows = write_drives_parquet(&parquet_path, &records)?;
    summary.parquet_path = Some(parquet_path);

    finish_ingest_run(conn, run_id, stored, &summary.errors)?;
    Ok(summary)
}

pub fn ingest_seasons(
    config: &IngestConfig,
    rules: &EngineRules,
    conn: &mut Connection,
    db_path: PathBuf,
    season_years: &[i32],
) -> Result<IngestSummary> {
    if season_years.is_empty() {
        return Err(anyhow!("no season years passed to ingest"));
    }
    let client = http_client()?;
    let cache = config.document_cache()?;
    let pool = build_fetch_pool(config.parallelism);

    let mut seasons = Vec::with_capacity(season_years.len());
    for &season_year in season_years {
        match ingest_season(config, rules, client, &cache, pool.as_ref(), conn, season_year)
            .with_context(|| format!("season {season_year}"))
        {
            Ok(summary) => seasons.push(summary),
            Err(err) => {
                tracing::warn!(season_year, "{err:#}");
                seasons.push(SeasonSummary {
                    season_year,
                    errors: vec![format!("{err:#}")],
                    ..SeasonSummary::default()
                });
            }
        }
    }

    Ok(IngestSummary { db_path, seasons })
}
