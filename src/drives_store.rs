use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::game::GameReport;
use crate::record::{DriveRecord, GameRecord};

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS games (
            game_id TEXT PRIMARY KEY,
            season_year INTEGER NOT NULL,
            season_type TEXT NOT NULL,
            game_week INTEGER NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_score INTEGER NOT NULL,
            away_score INTEGER NOT NULL,
            reconciliation TEXT NOT NULL,
            warnings_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_games_season ON games(season_year);

        CREATE TABLE IF NOT EXISTS drives (
            game_id TEXT NOT NULL,
            drive_id INTEGER NOT NULL,
            drive_pos_team TEXT NULL,
            drive_start INTEGER NULL,
            drive_start_time TEXT NULL,
            drive_num_plays INTEGER NOT NULL,
            drive_scoring_team TEXT NULL,
            drive_points INTEGER NOT NULL,
            PRIMARY KEY (game_id, drive_id)
        );

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            season_year INTEGER NOT NULL,
            games_total INTEGER NOT NULL,
            games_stored INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Upsert every report in one transaction. A game's previous drives are
/// replaced, not merged.
pub fn store_reports(conn: &mut Connection, reports: &[GameReport]) -> Result<usize> {
    let tx = conn.transaction().context("begin store transaction")?;
    for report in reports {
        upsert_game(&tx, report)?;
    }
    tx.commit().context("commit store transaction")?;
    Ok(reports.len())
}

fn upsert_game(tx: &rusqlite::Transaction<'_>, report: &GameReport) -> Result<()> {
    let record = report.game.export();
    let warnings_json = serde_json::to_string(&report.warnings).unwrap_or_else(|err| {
        tracing::warn!(game_id = %record.game_id, "unable to serialize warnings: {err}");
        "[]".to_string()
    });
    tx.execute(
        r#"
        INSERT INTO games (
            game_id, season_year, season_type, game_week, home_team, away_team,
            home_score, away_score, reconciliation, warnings_json, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(game_id) DO UPDATE SET
            season_year = excluded.season_year,
            season_type = excluded.season_type,
            game_week = excluded.game_week,
            home_team = excluded.home_team,
            away_team = excluded.away_team,
            home_score = excluded.home_score,
            away_score = excluded.away_score,
            reconciliation = excluded.reconciliation,
            warnings_json = excluded.warnings_json,
            updated_at = excluded.updated_at
        "#,
        params![
            record.game_id,
            record.season_year as i64,
            record.season_type,
            record.game_week as i64,
            record.home_team,
            record.away_team,
            report.game.home_score as i64,
            report.game.away_score as i64,
            report.reconciliation.label(),
            warnings_json,
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("upsert game {}", record.game_id))?;

    tx.execute(
        "DELETE FROM drives WHERE game_id = ?1",
        params![record.game_id],
    )
    .context("clear drives")?;
    for drive in &record.drives {
        tx.execute(
            r#"
            INSERT INTO drives (
                game_id, drive_id, drive_pos_team, drive_start, drive_start_time,
                drive_num_plays, drive_scoring_team, drive_points
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.game_id,
                drive.drive_id as i64,
                drive.drive_pos_team,
                drive.drive_start,
                drive.drive_start_time,
                drive.drive_num_plays as i64,
                drive.drive_scoring_team,
                drive.drive_points,
            ],
        )
        .with_context(|| format!("insert drive {} of {}", drive.drive_id, record.game_id))?;
    }
    Ok(())
}

pub fn load_season_records(conn: &Connection, season_year: i32) -> Result<Vec<GameRecord>> {
    let mut games_stmt = conn
        .prepare(
            r#"
            SELECT game_id, season_year, season_type, game_week, home_team, away_team
            FROM games
            WHERE season_year = ?1
            ORDER BY game_id ASC
            "#,
        )
        .context("prepare load games query")?;
    let mut drives_stmt = conn
        .prepare(
            r#"
            SELECT drive_id, drive_pos_team, drive_start, drive_start_time,
                   drive_num_plays, drive_scoring_team, drive_points
            FROM drives
            WHERE game_id = ?1
            ORDER BY drive_id ASC
            "#,
        )
        .context("prepare load drives query")?;

    let games = games_stmt
        .query_map(params![season_year as i64], |row| {
            Ok(GameRecord {
                game_id: row.get(0)?,
                season_year: row.get(1)?,
                season_type: row.get(2)?,
                game_week: row.get::<_, u32>(3)?,
                home_team: row.get(4)?,
                away_team: row.get(5)?,
                drives: Vec::new(),
            })
        })
        .context("query load games")?;

    let mut out = Vec::new();
    for game in games {
        let mut game = game.context("decode game row")?;
        let drives = drives_stmt
            .query_map(params![game.game_id], |row| {
                Ok(DriveRecord {
                    drive_id: row.get::<_, u32>(0)?,
                    drive_pos_team: row.get(1)?,
                    drive_start: row.get(2)?,
                    drive_start_time: row.get(3)?,
                    drive_num_plays: row.get::<_, u32>(4)? as usize,
                    drive_scoring_team: row.get(5)?,
                    drive_points: row.get(6)?,
                })
            })
            .context("query load drives")?;
        for drive in drives {
            game.drives.push(drive.context("decode drive row")?);
        }
        out.push(game);
    }
    Ok(out)
}

pub fn stored_game_ids(conn: &Connection, season_year: i32) -> Result<HashSet<String>> {
    let mut stmt = conn
        .prepare("SELECT game_id FROM games WHERE season_year = ?1")
        .context("prepare stored game ids query")?;
    let rows = stmt
        .query_map(params![season_year as i64], |row| row.get::<_, String>(0))
        .context("query stored game ids")?;
    let mut out = HashSet::new();
    for row in rows {
        out.insert(row.context("decode stored game id")?);
    }
    Ok(out)
}

pub fn begin_ingest_run(conn: &Connection, season_year: i32, games_total: usize) -> Result<i64> {
    conn.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, season_year, games_total, games_stored, errors_json)
         VALUES (?1, NULL, ?2, ?3, 0, '[]')",
        params![Utc::now().to_rfc3339(), season_year as i64, games_total as i64],
    )
    .context("insert ingest run")?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_ingest_run(
    conn: &Connection,
    run_id: i64,
    games_stored: usize,
    errors: &[String],
) -> Result<()> {
    let errors_json = serde_json::to_string(errors).unwrap_or_else(|err| {
        tracing::warn!(run_id, "unable to serialize ingest errors: {err}");
        "[]".to_string()
    });
    conn.execute(
        "UPDATE ingest_runs
         SET finished_at = ?1, games_stored = ?2, errors_json = ?3
         WHERE run_id = ?4",
        params![Utc::now().to_rfc3339(), games_stored as i64, errors_json, run_id],
    )
    .context("update ingest run")?;
    Ok(())
}
