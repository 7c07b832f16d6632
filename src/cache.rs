//! Single-slot news cache and the clock that judges its freshness.
//!
//! The aggregator owns a boxed [`NewsCache`], so runs use [`FileCache`]
//! while tests (and `--no-cache`) use [`MemoryCache`]. Freshness is decided
//! by the aggregator from [`CacheEntry::is_fresh`] and its [`Clock`], never
//! by the store itself.
//!
//! # File layout
//!
//! ```text
//! {"timestamp": 1730000000.123, "news": [{"title": ..., "hot_score": 98, ...}]}
//! ```

use crate::error::CacheError;
use crate::models::CacheEntry;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, instrument};

/// Source of "now" in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        chrono::Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// Storage for the one cached aggregation result.
#[async_trait]
pub trait NewsCache: Send + Sync {
    /// Read the stored entry. `Ok(None)` when nothing has been written yet.
    async fn load(&self) -> Result<Option<CacheEntry>, CacheError>;

    /// Replace the stored entry.
    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError>;
}

/// JSON file at a fixed path.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NewsCache for FileCache {
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<CacheEntry>, CacheError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file yet");
                return Ok(None);
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let entry = serde_json::from_str::<CacheEntry>(&raw).map_err(|source| {
            CacheError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!(items = entry.news.len(), timestamp = entry.timestamp, "Read cache file");
        Ok(Some(entry))
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        // serializing plain structs with string keys cannot fail
        let json = serde_json::to_string(entry).map_err(|source| CacheError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| CacheError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::write(&self.path, json)
            .await
            .map_err(|source| CacheError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(items = entry.news.len(), "Wrote cache file");
        Ok(())
    }
}

/// Process-local cache; starts empty and lives as long as the aggregator.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: Mutex<Option<CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the slot.
    pub fn with_entry(entry: CacheEntry) -> Self {
        Self {
            slot: Mutex::new(Some(entry)),
        }
    }
}

#[async_trait]
impl NewsCache for MemoryCache {
    async fn load(&self) -> Result<Option<CacheEntry>, CacheError> {
        let slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(slot.clone())
    }

    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(entry.clone());
        Ok(())
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    millis: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(secs: f64) -> Self {
        Self {
            millis: std::sync::atomic::AtomicI64::new((secs * 1000.0) as i64),
        }
    }

    pub fn advance(&self, secs: f64) {
        self.millis.fetch_add(
            (secs * 1000.0) as i64,
            std::sync::atomic::Ordering::SeqCst,
        );
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.millis.load(std::sync::atomic::Ordering::SeqCst) as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;

    fn entry_at(timestamp: f64) -> CacheEntry {
        CacheEntry {
            timestamp,
            news: fallback::default_dataset(),
        }
    }

    #[tokio::test]
    async fn test_file_cache_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("tech_news_cache.json"));
        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_cache_round_trips_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested").join("cache.json"));
        let entry = entry_at(1_700_000_000.5);

        cache.store(&entry).await.unwrap();
        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded, entry);

        let raw = std::fs::read_to_string(cache.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["timestamp"].is_number());
        assert_eq!(value["news"][0]["from_api"], "Mock");
        assert_eq!(value["news"][0]["hot_score"], 98);
    }

    #[tokio::test]
    async fn test_file_cache_corrupt_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, r#"{"timestamp": 17000, "news": [{"title": "#).unwrap();

        let err = FileCache::new(&path).load().await.unwrap_err();
        assert!(matches!(err, CacheError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_file_cache_store_into_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file cannot act as the parent directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let cache = FileCache::new(blocker.join("cache.json"));
        let err = cache.store(&entry_at(0.0)).await.unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[tokio::test]
    async fn test_memory_cache_overwrites_slot() {
        let cache = MemoryCache::new();
        assert!(cache.load().await.unwrap().is_none());

        cache.store(&entry_at(1.0)).await.unwrap();
        cache.store(&entry_at(2.0)).await.unwrap();
        assert_eq!(cache.load().await.unwrap().unwrap().timestamp, 2.0);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at(100.0);
        clock.advance(3599.5);
        assert_eq!(clock.now(), 3699.5);
    }
}
