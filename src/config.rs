use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::http_cache::{DocumentCache, app_cache_dir};
use crate::rules::EngineRules;
use crate::schedule::DEFAULT_SKIP_GAME_IDS;

pub const DEFAULT_FEED_BASE_URL: &str = "http://www.nfl.com/feeds-rs";

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub feed_base_url: String,
    pub parallelism: usize,
    pub min_fetch_interval: Duration,
    pub skip_game_ids: Vec<String>,
    pub rules_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub cache_dir: Option<PathBuf>,
    pub only_new_games: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            parallelism: 4,
            min_fetch_interval: Duration::from_millis(2000),
            skip_game_ids: DEFAULT_SKIP_GAME_IDS.iter().map(|s| s.to_string()).collect(),
            rules_path: None,
            output_dir: PathBuf::from("output"),
            cache_dir: app_cache_dir(),
            only_new_games: false,
        }
    }
}

impl IngestConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let parallelism = env::var("PBP_FETCH_PARALLELISM")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.parallelism)
            .clamp(1, 16);
        let min_fetch_interval = env::var("PBP_FETCH_MIN_INTERVAL_MS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.min_fetch_interval);
        let skip_game_ids = match env::var("PBP_SKIP_GAME_IDS") {
            Ok(raw) => parse_id_list(&raw),
            Err(_) => defaults.skip_game_ids,
        };

        Self {
            feed_base_url: opt_env("PBP_FEED_BASE_URL").unwrap_or(defaults.feed_base_url),
            parallelism,
            min_fetch_interval,
            skip_game_ids,
            rules_path: opt_env("PBP_RULES_PATH").map(PathBuf::from),
            output_dir: opt_env("PBP_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            cache_dir: opt_env("PBP_CACHE_DIR")
                .map(PathBuf::from)
                .or(defaults.cache_dir),
            only_new_games: opt_env("PBP_ONLY_NEW_GAMES")
                .map(|val| parse_flag(&val))
                .unwrap_or(defaults.only_new_games),
        }
    }

    pub fn load_rules(&self) -> Result<EngineRules> {
        match self.rules_path.as_deref() {
            Some(path) => EngineRules::load(path),
            None => Ok(EngineRules::default()),
        }
    }

    pub fn document_cache(&self) -> Result<DocumentCache> {
        let root = self
            .cache_dir
            .clone()
            .context("unable to resolve cache dir (set PBP_CACHE_DIR)")?;
        Ok(DocumentCache::new(root, self.min_fetch_interval))
    }

    pub fn default_db_path(&self) -> PathBuf {
        self.output_dir.join("drives.sqlite")
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn parse_id_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let id = part.trim();
        if !id.is_empty() && !out.iter().any(|existing| existing == id) {
            out.push(id.to_string());
        }
    }
    out
}
