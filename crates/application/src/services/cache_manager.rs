use dashmap::DashMap;
use kubecent_domain::DomainError;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A cached value together with the time it was stored and how long it lives.
///
/// Entries are never mutated: a refresh replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    key: Arc<str>,
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    pub fn new(key: &str, value: V, ttl: Duration) -> Self {
        Self {
            key: Arc::from(key),
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `now - created_at > ttl`. An entry exactly `ttl` old is still fresh.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// Counters since process start. There is no reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub cached_items: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.expired;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

type InflightResult<V> = Option<Result<V, DomainError>>;
type InflightSender<V> = Arc<watch::Sender<InflightResult<V>>>;
type InflightMap<V> = Arc<DashMap<Arc<str>, InflightSender<V>, FxBuildHasher>>;

/// Clears the in-flight slot if the leader's fetch is dropped before it
/// publishes a result, waking followers so one of them can take over.
struct InflightLeaderGuard<V> {
    inflight: InflightMap<V>,
    key: Arc<str>,
    sender: InflightSender<V>,
}

impl<V> InflightLeaderGuard<V> {
    fn publish(self, result: InflightResult<V>) {
        let removed = self
            .inflight
            .remove_if(&self.key, |_, tx| Arc::ptr_eq(tx, &self.sender));
        if let Some((_, tx)) = removed {
            let _ = tx.send(result);
        }
    }
}

impl<V> Drop for InflightLeaderGuard<V> {
    fn drop(&mut self) {
        let removed = self
            .inflight
            .remove_if(&self.key, |_, tx| Arc::ptr_eq(tx, &self.sender));
        if let Some((_, tx)) = removed {
            let _ = tx.send(None);
        }
    }
}

enum InflightRole<V> {
    Leader(InflightLeaderGuard<V>),
    Follower(watch::Receiver<InflightResult<V>>),
}

/// In-memory TTL cache with single-flight `get_or_set`.
///
/// All reads and writes of the entry map go through one mutex which is never
/// held across an `.await`. Concurrent `get_or_set` calls for the same key
/// share one fetch: the first caller becomes the leader and runs `fetch`, the
/// others wait on a watch channel for the leader's result (value or error).
/// Unrelated keys never wait on each other's fetches.
pub struct CacheManager<V> {
    entries: Mutex<HashMap<Arc<str>, CacheEntry<V>>>,
    default_ttl: Duration,
    counters: CacheCounters,
    inflight: InflightMap<V>,
}

impl<V> CacheManager<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(default_ttl: Duration) -> Self {
        info!(ttl_secs = default_ttl.as_secs(), "Initializing cost cache");
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
            counters: CacheCounters::default(),
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Arc<str>, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fresh value for `key`, counting a hit, a miss, or an expiry.
    /// An expired entry is removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        let now = Instant::now();

        match entries.get(key) {
            None => {
                self.counters.misses.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(key = %key, "Cache MISS");
                None
            }
            Some(entry) if entry.is_expired_at(now) => {
                let age_secs = now.saturating_duration_since(entry.created_at).as_secs_f64();
                entries.remove(key);
                self.counters.expired.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(key = %key, age_secs, "Cache EXPIRED");
                None
            }
            Some(entry) => {
                self.counters.hits.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(key = %key, "Cache HIT");
                Some(entry.value.clone())
            }
        }
    }

    /// Fresh value without touching the counters or evicting anything.
    fn peek(&self, key: &str) -> Option<V> {
        let entries = self.lock();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, None);
    }

    /// Store unconditionally, replacing any previous entry for `key`.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(key, value, ttl);
        self.lock().insert(Arc::clone(&entry.key), entry);
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache SET");
    }

    pub fn delete(&self, key: &str) -> bool {
        let existed = self.lock().remove(key).is_some();
        if existed {
            debug!(key = %key, "Cache DELETE");
        }
        existed
    }

    pub fn clear(&self) -> usize {
        let count = {
            let mut entries = self.lock();
            let count = entries.len();
            entries.clear();
            count
        };
        info!(count, "Cache cleared");
        count
    }

    pub fn cleanup_expired(&self) -> usize {
        let removed = {
            let mut entries = self.lock();
            let now = Instant::now();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };
        if removed > 0 {
            info!(removed, "Cache cleanup removed expired entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(AtomicOrdering::Relaxed),
            misses: self.counters.misses.load(AtomicOrdering::Relaxed),
            expired: self.counters.expired.load(AtomicOrdering::Relaxed),
            cached_items: self.len(),
        }
    }

    /// Cached value for `key`, or the result of `fetch` stored with the
    /// default TTL. A failed fetch caches nothing and its error is returned
    /// to the leader and every waiting follower.
    pub async fn get_or_set<F, Fut>(&self, key: &str, fetch: F) -> Result<V, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>>,
    {
        self.get_or_set_with_ttl(key, None, fetch).await
    }

    pub async fn get_or_set_with_ttl<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<V, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>>,
    {
        let mut fetch = Some(fetch);

        loop {
            if let Some(value) = self.get(key) {
                return Ok(value);
            }

            match self.register_or_join_inflight(key) {
                InflightRole::Follower(rx) => {
                    if let Some(result) = wait_for_leader(rx).await {
                        return result;
                    }
                    // Leader was dropped mid-fetch; retry and possibly take over.
                }
                InflightRole::Leader(guard) => {
                    // Another leader may have finished between our miss and
                    // our registration.
                    if let Some(value) = self.peek(key) {
                        guard.publish(Some(Ok(value.clone())));
                        return Ok(value);
                    }

                    let fetch = fetch.take().ok_or_else(|| {
                        DomainError::Internal(format!("fetch for '{}' already consumed", key))
                    })?;

                    debug!(key = %key, "Cache FETCH");
                    let result = fetch().await;
                    if let Ok(value) = &result {
                        self.set_with_ttl(key, value.clone(), ttl);
                    }
                    guard.publish(Some(result.clone()));
                    return result;
                }
            }
        }
    }

    fn register_or_join_inflight(&self, key: &str) -> InflightRole<V> {
        let key: Arc<str> = Arc::from(key);
        match self.inflight.entry(Arc::clone(&key)) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                InflightRole::Follower(rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, _rx) = watch::channel(None);
                let sender = Arc::new(tx);
                e.insert(Arc::clone(&sender));
                InflightRole::Leader(InflightLeaderGuard {
                    inflight: Arc::clone(&self.inflight),
                    key,
                    sender,
                })
            }
        }
    }

    /// Number of keys with a fetch currently in flight.
    pub fn inflight_count(&self) -> usize {
        self.inflight.len()
    }
}

async fn wait_for_leader<V: Clone>(
    mut rx: watch::Receiver<InflightResult<V>>,
) -> Option<Result<V, DomainError>> {
    if rx.changed().await.is_ok() {
        if let Some(result) = rx.borrow_and_update().clone() {
            return Some(result);
        }
    }
    rx.borrow().clone()
}
