pub mod boxscore_fetch;
pub mod config;
pub mod diagnostics;
pub mod drive;
pub mod drives_export;
pub mod drives_store;
pub mod error;
pub mod feed_value;
pub mod game;
pub mod http_cache;
pub mod http_client;
pub mod ingest;
pub mod integrity;
pub mod play;
pub mod position;
pub mod reconcile;
pub mod record;
pub mod rules;
pub mod schedule;
