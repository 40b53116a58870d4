use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

const CACHE_DIR: &str = "pbp_drives";
const RAW_DIR: &str = "raw";

/// Raw feed documents on disk, one file per document. A document that is
/// already cached is never fetched again; network fetches are spaced at
/// least `min_interval` apart across all threads sharing the cache.
#[derive(Debug)]
pub struct DocumentCache {
    root: PathBuf,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl DocumentCache {
    pub fn new(root: PathBuf, min_interval: Duration) -> Self {
        Self {
            root,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn document_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join(RAW_DIR).join(kind).join(format!("{id}.json"))
    }

    pub fn read(&self, kind: &str, id: &str) -> Option<String> {
        let raw = fs::read_to_string(self.document_path(kind, id)).ok()?;
        (!raw.trim().is_empty()).then_some(raw)
    }

    pub fn store(&self, kind: &str, id: &str, body: &str) -> Result<PathBuf> {
        let path = self.document_path(kind, id);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create cache dir {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).context("write cached document")?;
        fs::rename(&tmp, &path).context("swap cached document")?;
        Ok(path)
    }

    pub fn fetch(&self, client: &Client, url: &str, kind: &str, id: &str) -> Result<String> {
        if let Some(body) = self.read(kind, id) {
            return Ok(body);
        }

        self.wait_turn();
        let resp = client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }

        self.store(kind, id, &body)?;
        Ok(body)
    }

    fn wait_turn(&self) {
        // The lock is held through the sleep so concurrent callers queue up.
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pbp_drives_{name}_{}", std::process::id()))
    }

    #[test]
    fn stored_documents_are_read_back() {
        let root = temp_root("cache_roundtrip");
        let cache = DocumentCache::new(root.clone(), Duration::ZERO);
        assert!(cache.read("boxscorePbp", "2015091000").is_none());
        let path = cache
            .store("boxscorePbp", "2015091000", "{\"score\":{}}")
            .expect("store should succeed");
        assert!(path.ends_with("raw/boxscorePbp/2015091000.json"));
        assert_eq!(
            cache.read("boxscorePbp", "2015091000").as_deref(),
            Some("{\"score\":{}}")
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn blank_documents_count_as_missing() {
        let root = temp_root("cache_blank");
        let cache = DocumentCache::new(root.clone(), Duration::ZERO);
        cache
            .store("schedules", "2015", "  ")
            .expect("store should succeed");
        assert!(cache.read("schedules", "2015").is_none());
        let _ = fs::remove_dir_all(root);
    }
}
