use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use pbp_drives::boxscore_fetch::parse_boxscore_json;
use pbp_drives::config::IngestConfig;
use pbp_drives::game::{GameMeta, reconstruct_game};

// Rebuilds one locally saved boxscore feed and prints the exported record.
// No network access; schedule facts come from the command line.
fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: rebuild_game <feed.json> [--season=YYYY] [--type=REG] [--week=N] [--home=ABBR] [--away=ABBR] [--game-id=ID]"))?;

    let game_id = flag(&args, "--game-id").unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "local".to_string())
    });
    let season_year = match flag(&args, "--season") {
        Some(raw) => raw.parse::<i32>().context("invalid --season")?,
        None => season_from_game_id(&game_id).context("pass --season for this game id")?,
    };
    let meta = GameMeta {
        season_year,
        season_type: flag(&args, "--type").unwrap_or_else(|| "REG".to_string()),
        game_week: flag(&args, "--week")
            .map(|w| w.parse::<u32>())
            .transpose()
            .context("invalid --week")?
            .unwrap_or(0),
        home_team: flag(&args, "--home").unwrap_or_default(),
        away_team: flag(&args, "--away").unwrap_or_default(),
        game_id,
    };

    let rules = IngestConfig::from_env().load_rules()?;
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let feed = parse_boxscore_json(&raw)?;
    let report = reconstruct_game(meta, &feed, &rules)?;

    for line in report.log_lines() {
        eprintln!("{line}");
    }
    eprintln!(
        "[INFO] {} reconciliation={}",
        report.game,
        report.reconciliation.label()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report.game.export()).context("serialize record")?
    );
    Ok(())
}

fn flag(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    args.iter()
        .find_map(|a| a.strip_prefix(&prefix))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Game ids are date-based, e.g. 2015091000.
fn season_from_game_id(game_id: &str) -> Option<i32> {
    let year = game_id.get(..4)?.parse::<i32>().ok()?;
    let month = game_id.get(4..6)?.parse::<u32>().ok()?;
    // January/February games belong to the previous season.
    Some(if month <= 2 { year - 1 } else { year })
}
