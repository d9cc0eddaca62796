//! Pool cache with request coalescing.
//!
//! Each key moves `Pending -> Ready` or `Pending -> Failed`. The fetch runs
//! as a spawned task, so it completes and populates the cache even when
//! every caller that asked for it has gone away. Failed keys are retried on
//! a later request until `max_fetch_attempts` is reached.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::application::providers::{PoolFetchError, PoolProvider};

use super::config::PoolCacheConfig;
use super::keys::PoolKey;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::pool";

const METRIC_POOL_HIT: &str = "simfeed_pool_cache_hit_total";
const METRIC_POOL_MISS: &str = "simfeed_pool_cache_miss_total";
const METRIC_POOL_COALESCED: &str = "simfeed_pool_cache_coalesced_total";
const METRIC_POOL_FETCH_FAILURE: &str = "simfeed_pool_fetch_failure_total";
const METRIC_POOL_FETCH_MS: &str = "simfeed_pool_fetch_ms";

/// Immutable ordered candidate list shared by every reader.
pub type Pool = Arc<[String]>;

type FetchOutcome = Result<Pool, PoolFetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

enum PoolEntry {
    Pending { attempt: u32, fetch: SharedFetch },
    Ready(Pool),
    Failed { attempts: u32, error: PoolFetchError },
}

/// Externally visible state of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    Missing,
    Pending,
    Ready,
    Failed,
}

enum Lookup {
    Hit(Pool),
    Wait(SharedFetch),
    Exhausted,
}

/// Session-scoped pool cache.
///
/// Must be used from within a Tokio runtime: fetches are spawned tasks.
pub struct PoolCache {
    config: PoolCacheConfig,
    provider: Arc<dyn PoolProvider>,
    entries: Arc<Mutex<HashMap<PoolKey, PoolEntry>>>,
}

impl PoolCache {
    pub fn new(config: PoolCacheConfig, provider: Arc<dyn PoolProvider>) -> Self {
        Self {
            config,
            provider,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &PoolCacheConfig {
        &self.config
    }

    /// Resolve the pool for `key`, fetching it at most once at a time.
    ///
    /// Returns `None` when the fetch failed or the key has exhausted its
    /// attempts; callers fall back to authored content.
    pub async fn get_pool(&self, key: &PoolKey) -> Option<Pool> {
        let fetch = match self.lookup(key) {
            Lookup::Hit(pool) => return Some(pool),
            Lookup::Exhausted => return None,
            Lookup::Wait(fetch) => fetch,
        };

        fetch.await.ok()
    }

    /// Start fetching `key` if nothing is cached or in flight, without waiting.
    pub fn prefetch(&self, key: &PoolKey) {
        let _ = self.lookup(key);
    }

    /// Synchronous read of a ready pool.
    pub fn peek(&self, key: &PoolKey) -> Option<Pool> {
        match mutex_lock(&self.entries, SOURCE, "peek").get(key) {
            Some(PoolEntry::Ready(pool)) => Some(Arc::clone(pool)),
            _ => None,
        }
    }

    pub fn status(&self, key: &PoolKey) -> PoolStatus {
        match mutex_lock(&self.entries, SOURCE, "status").get(key) {
            None => PoolStatus::Missing,
            Some(PoolEntry::Pending { .. }) => PoolStatus::Pending,
            Some(PoolEntry::Ready(_)) => PoolStatus::Ready,
            Some(PoolEntry::Failed { .. }) => PoolStatus::Failed,
        }
    }

    /// Drop failed entries so the next request fetches again.
    ///
    /// Keys that reached `max_fetch_attempts` stay failed until this runs;
    /// `FeedService::snapshot` calls it at the start of every pass. Returns
    /// the number of keys re-armed.
    pub fn forget_failures(&self) -> usize {
        let mut entries = mutex_lock(&self.entries, SOURCE, "forget_failures");
        let before = entries.len();
        entries.retain(|_, entry| !matches!(entry, PoolEntry::Failed { .. }));
        before - entries.len()
    }

    fn lookup(&self, key: &PoolKey) -> Lookup {
        let mut entries = mutex_lock(&self.entries, SOURCE, "lookup");
        let max_attempts = self.config.max_fetch_attempts.get();

        let attempt = match entries.get(key) {
            Some(PoolEntry::Ready(pool)) => {
                counter!(METRIC_POOL_HIT, "kind" => key.kind()).increment(1);
                return Lookup::Hit(Arc::clone(pool));
            }
            Some(PoolEntry::Pending { attempt, fetch }) => {
                counter!(METRIC_POOL_COALESCED, "kind" => key.kind()).increment(1);
                debug!(pool_key = %key, attempt, "Joining in-flight pool fetch");
                return Lookup::Wait(fetch.clone());
            }
            Some(PoolEntry::Failed { attempts, error }) if *attempts >= max_attempts => {
                debug!(
                    pool_key = %key,
                    attempts,
                    error = %error,
                    "Pool fetch attempts exhausted; serving fallback"
                );
                return Lookup::Exhausted;
            }
            Some(PoolEntry::Failed { attempts, .. }) => attempts + 1,
            None => 1,
        };

        counter!(METRIC_POOL_MISS, "kind" => key.kind()).increment(1);
        let fetch = self.start_fetch(key, attempt);
        entries.insert(
            key.clone(),
            PoolEntry::Pending {
                attempt,
                fetch: fetch.clone(),
            },
        );
        Lookup::Wait(fetch)
    }

    // Called with the entries lock held; the spawned task settles only after
    // the caller has inserted the pending entry and released the lock.
    fn start_fetch(&self, key: &PoolKey, attempt: u32) -> SharedFetch {
        let provider = Arc::clone(&self.provider);
        let entries = Arc::clone(&self.entries);
        let task_key = key.clone();

        debug!(pool_key = %key, attempt, "Starting pool fetch");
        let task = tokio::spawn(async move {
            let started = Instant::now();
            let outcome = match AssertUnwindSafe(fetch_pool(provider.as_ref(), &task_key))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(PoolFetchError::Aborted(
                    "pool provider panicked".to_string(),
                )),
            };
            histogram!(METRIC_POOL_FETCH_MS, "kind" => task_key.kind())
                .record(started.elapsed().as_secs_f64() * 1000.0);
            settle(&entries, &task_key, attempt, &outcome);
            outcome
        });

        async move {
            task.await
                .unwrap_or_else(|err| Err(PoolFetchError::Aborted(err.to_string())))
        }
        .boxed()
        .shared()
    }
}

async fn fetch_pool(provider: &dyn PoolProvider, key: &PoolKey) -> FetchOutcome {
    let items = match key {
        PoolKey::Avatar(persona) => provider.fetch_avatar_pool(*persona).await?,
        PoolKey::Image(topic) => provider.fetch_image_pool(topic).await?,
    };
    Ok(Pool::from(items))
}

fn settle(
    entries: &Mutex<HashMap<PoolKey, PoolEntry>>,
    key: &PoolKey,
    attempt: u32,
    outcome: &FetchOutcome,
) {
    let entry = match outcome {
        Ok(pool) => {
            info!(pool_key = %key, size = pool.len(), attempt, "Pool ready");
            PoolEntry::Ready(Arc::clone(pool))
        }
        Err(error) => {
            counter!(METRIC_POOL_FETCH_FAILURE, "kind" => key.kind()).increment(1);
            warn!(pool_key = %key, attempt, error = %error, "Pool fetch failed");
            PoolEntry::Failed {
                attempts: attempt,
                error: error.clone(),
            }
        }
    };

    mutex_lock(entries, SOURCE, "settle").insert(key.clone(), entry);
}
