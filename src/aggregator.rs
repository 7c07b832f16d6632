//! News aggregation: cache check, ranked sources, merge, score, sort.
//!
//! [`NewsAggregator::fetch_news`] never fails. Source errors contribute no
//! items, cache read errors count as a miss and cache write errors are
//! ignored; every one of them is logged.
//!
//! Sources are queried in priority order and only for the number of items
//! still missing, so a run stops calling providers as soon as it holds
//! `count` unique headlines.

use crate::cache::{Clock, NewsCache, SystemClock};
use crate::categorize::categorize;
use crate::models::{ApiTag, CacheEntry, NewsItem, RawArticle, clamp_hot_score};
use crate::sources::NewsSource;
use crate::utils::{clean_text, truncate_chars};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Default time-to-live of the cache slot, in seconds.
pub const DEFAULT_CACHE_DURATION_SECS: u64 = 3600;

const BODY_SUMMARY_CHARS: usize = 150;
const TITLE_SUMMARY_CHARS: usize = 80;

/// Merges ranked providers into one scored, sorted headline list.
pub struct NewsAggregator {
    sources: Vec<Box<dyn NewsSource>>,
    cache: Box<dyn NewsCache>,
    fallback: Vec<NewsItem>,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    cache_duration_secs: u64,
}

impl NewsAggregator {
    /// Aggregator on the wall clock with an OS-seeded rng and a one hour cache.
    pub fn new(
        sources: Vec<Box<dyn NewsSource>>,
        cache: Box<dyn NewsCache>,
        fallback: Vec<NewsItem>,
    ) -> Self {
        Self {
            sources,
            cache,
            fallback,
            clock: Arc::new(SystemClock),
            rng: StdRng::from_os_rng(),
            cache_duration_secs: DEFAULT_CACHE_DURATION_SECS,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make hot scores reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_cache_duration(mut self, secs: u64) -> Self {
        self.cache_duration_secs = secs;
        self
    }

    /// Up to `count` headlines, highest hot score first.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_news(&mut self, count: usize) -> Vec<NewsItem> {
        if count == 0 {
            return Vec::new();
        }

        if let Some(news) = self.cached().await {
            info!(cached = news.len(), "Serving headlines from cache");
            return news.into_iter().take(count).collect();
        }

        let mut merged = self.collect(count).await;

        if merged.is_empty() {
            warn!(
                fallback = self.fallback.len(),
                "No source produced headlines; using fallback dataset"
            );
            merged = self.fallback.iter().cloned().map(within_bounds).collect();
        }

        // stable: equal scores keep merge order
        merged.sort_by(|a, b| b.hot_score.cmp(&a.hot_score));

        let entry = CacheEntry {
            timestamp: self.clock.now(),
            news: merged,
        };
        if let Err(e) = self.cache.store(&entry).await {
            error!(error = %e, "Failed to write news cache");
        }

        info!(total = entry.news.len(), returned = entry.news.len().min(count), "Aggregation complete");
        let mut news = entry.news;
        news.truncate(count);
        news
    }

    /// Fresh, non-empty cached headlines.
    async fn cached(&self) -> Option<Vec<NewsItem>> {
        let entry = match self.cache.load().await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Unreadable news cache; treating as a miss");
                return None;
            }
        };

        let now = self.clock.now();
        if !entry.is_fresh(now, self.cache_duration_secs) {
            debug!(age_secs = now - entry.timestamp, "Cache entry expired");
            return None;
        }
        if entry.news.is_empty() {
            debug!("Cache entry is empty; treating as a miss");
            return None;
        }
        // the file may have been edited by hand
        Some(entry.news.into_iter().map(within_bounds).collect())
    }

    /// Query sources in priority order until `count` unique titles are held.
    async fn collect(&mut self, count: usize) -> Vec<NewsItem> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged: Vec<NewsItem> = Vec::new();

        for idx in 0..self.sources.len() {
            if merged.len() >= count {
                debug!(accumulated = merged.len(), "Enough headlines; skipping remaining sources");
                break;
            }

            let source = &self.sources[idx];
            let tag = source.tag();
            if !source.is_configured() {
                warn!(api = %tag, "No API key configured; skipping source");
                continue;
            }

            let wanted = (count - merged.len()).min(source.page_limit());
            let articles = match source.fetch(wanted).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(api = %tag, error = %e, "Source request failed");
                    continue;
                }
            };

            let fetched = articles.len();
            let mut accepted = 0usize;
            for raw in articles {
                if raw.title.trim().is_empty() {
                    continue;
                }
                if !seen.insert(raw.title.clone()) {
                    continue;
                }
                let item = self.normalize(tag, raw);
                merged.push(item);
                accepted += 1;
            }
            info!(api = %tag, fetched, accepted, "Merged source results");
        }

        merged
    }

    fn normalize(&mut self, tag: ApiTag, raw: RawArticle) -> NewsItem {
        let summary = summarize(tag, &raw);
        let category = categorize(&raw.title, tag.script());
        let hot_score = match raw.hot_score {
            Some(native) => clamp_hot_score(native),
            None => self.rng.random_range(tag.score_range()),
        };
        let source = raw
            .source_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| tag.default_publisher().to_string());

        NewsItem {
            title: raw.title,
            summary,
            source,
            category,
            hot_score,
            url: raw.url.unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
            from_api: tag,
        }
    }
}

fn within_bounds(mut item: NewsItem) -> NewsItem {
    item.hot_score = clamp_hot_score(item.hot_score);
    item
}

/// Description when present, else a slice of the body, else the title.
fn summarize(tag: ApiTag, raw: &RawArticle) -> String {
    let description = raw
        .description
        .as_deref()
        .map(clean_text)
        .filter(|d| !d.is_empty());
    if let Some(description) = description {
        return description;
    }

    match tag {
        ApiTag::TianXing => format!("{}...", truncate_chars(&raw.title, TITLE_SUMMARY_CHARS)),
        _ => {
            let body = raw.content.as_deref().map(clean_text).unwrap_or_default();
            truncate_chars(&body, BODY_SUMMARY_CHARS).to_string()
        }
    }
}
