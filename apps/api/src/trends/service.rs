//! Trend cache. Holds a single ranked snapshot and rebuilds it when it is
//! older than the TTL or when a refresh is forced. Refreshes are serialized,
//! so callers arriving during a rebuild reuse its result.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::models::trend::TrendRecord;
use crate::repository::TrendRepository;
use crate::trends::build_trend_records;
use crate::trends::source::{fallback_trends, TrendSource, TrendSourceError};

#[derive(Debug, Clone)]
pub struct TrendSnapshot {
    pub trends: Arc<Vec<TrendRecord>>,
    pub fetched_at: DateTime<Utc>,
    /// True when the live source was unavailable and canned trends were used.
    pub from_fallback: bool,
}

struct CachedSnapshot {
    snapshot: TrendSnapshot,
    built_at: Instant,
}

pub struct TrendService {
    source: Arc<dyn TrendSource>,
    store: Arc<dyn TrendRepository>,
    ttl: Duration,
    cached: RwLock<Option<CachedSnapshot>>,
    refresh_lock: Mutex<()>,
}

impl TrendService {
    pub fn new(source: Arc<dyn TrendSource>, store: Arc<dyn TrendRepository>, ttl: Duration) -> Self {
        Self {
            source,
            store,
            ttl,
            cached: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Returns the cached snapshot, rebuilding it when stale or forced.
    pub async fn current(&self, force_refresh: bool) -> TrendSnapshot {
        if !force_refresh {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return snapshot;
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have rebuilt while we waited.
        if !force_refresh {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return snapshot;
            }
        }

        let snapshot = self.rebuild().await;
        *self.cached.write().await = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            built_at: Instant::now(),
        });
        snapshot
    }

    async fn fresh_snapshot(&self) -> Option<TrendSnapshot> {
        let cached = self.cached.read().await;
        cached
            .as_ref()
            .filter(|c| c.built_at.elapsed() < self.ttl)
            .map(|c| c.snapshot.clone())
    }

    async fn rebuild(&self) -> TrendSnapshot {
        let (raw, from_fallback) = match self.source.fetch().await {
            Ok(raw) => (raw, false),
            Err(TrendSourceError::NotConfigured) => {
                info!(
                    "Trend source {} not configured; using fallback trends",
                    self.source.name()
                );
                (fallback_trends(), true)
            }
            Err(e) => {
                warn!(
                    "Trend source {} unavailable ({e}); using fallback trends",
                    self.source.name()
                );
                (fallback_trends(), true)
            }
        };

        let records = {
            let mut rng = rand::thread_rng();
            build_trend_records(&raw, &mut rng)
        };
        info!(
            "Built {} trend records from {} raw trends (fallback={})",
            records.len(),
            raw.len(),
            from_fallback
        );

        if let Err(e) = self.store.upsert_many(&records).await {
            warn!("Failed to persist trend records: {e}");
        }

        TrendSnapshot {
            trends: Arc::new(records),
            fetched_at: Utc::now(),
            from_fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::models::trend::RawTrend;
    use crate::repository::memory::MemoryStore;
    use crate::repository::RepoResult;

    struct CountingSource {
        calls: AtomicUsize,
        result: Option<Vec<RawTrend>>,
    }

    impl CountingSource {
        fn ok(trends: Vec<RawTrend>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Some(trends),
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TrendSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch(&self) -> Result<Vec<RawTrend>, TrendSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or(TrendSourceError::Api(503))
        }
    }

    struct BrokenTrendStore;

    #[async_trait]
    impl TrendRepository for BrokenTrendStore {
        async fn upsert_many(&self, _trends: &[TrendRecord]) -> RepoResult<()> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    fn live_trends() -> Vec<RawTrend> {
        vec![
            RawTrend::new("Bitcoin ETF", Some(120_000)),
            RawTrend::new("NBA Finals", Some(300_000)),
            RawTrend::new("Random Meme", Some(5_000)),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_is_reused_within_ttl() {
        let source = CountingSource::ok(live_trends());
        let store = Arc::new(MemoryStore::new());
        let service = TrendService::new(source.clone(), store, Duration::from_secs(900));

        let first = service.current(false).await;
        tokio::time::advance(Duration::from_secs(600)).await;
        let second = service.current(false).await;

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first.trends, &second.trends));
        assert!(!first.from_fallback);
        assert_eq!(first.trends.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_snapshot_is_rebuilt() {
        let source = CountingSource::ok(live_trends());
        let store = Arc::new(MemoryStore::new());
        let service = TrendService::new(source.clone(), store, Duration::from_secs(900));

        service.current(false).await;
        tokio::time::advance(Duration::from_secs(901)).await;
        service.current(false).await;

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_refresh_bypasses_cache() {
        let source = CountingSource::ok(live_trends());
        let store = Arc::new(MemoryStore::new());
        let service = TrendService::new(source.clone(), store, Duration::from_secs(900));

        service.current(false).await;
        service.current(true).await;

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_source_uses_fallback() {
        let source = CountingSource::down();
        let store = Arc::new(MemoryStore::new());
        let service = TrendService::new(source, store.clone(), Duration::from_secs(900));

        let snapshot = service.current(false).await;

        assert!(snapshot.from_fallback);
        assert!(!snapshot.trends.is_empty());
        assert!(snapshot.trends.iter().any(|t| t.topic == "Bitcoin ETF"));
        assert_eq!(store.trend_count().await, snapshot.trends.len());
    }

    #[tokio::test]
    async fn test_records_are_upserted_by_topic() {
        let source = CountingSource::ok(live_trends());
        let store = Arc::new(MemoryStore::new());
        let service = TrendService::new(source, store.clone(), Duration::from_secs(900));

        service.current(false).await;
        service.current(true).await;

        assert_eq!(store.trend_count().await, 2);
        assert!(store.stored_trend("NBA Finals").await.is_some());
        assert!(store.stored_trend("Random Meme").await.is_none());
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_break_snapshot() {
        let source = CountingSource::ok(live_trends());
        let service = TrendService::new(source, Arc::new(BrokenTrendStore), Duration::from_secs(900));

        let snapshot = service.current(false).await;
        assert_eq!(snapshot.trends.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let source = CountingSource::ok(live_trends());
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(TrendService::new(source.clone(), store, Duration::from_secs(900)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.current(false).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(source.calls(), 1);
    }
}
