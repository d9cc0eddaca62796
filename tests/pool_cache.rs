use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use simfeed::application::providers::{PoolFetchError, PoolProvider};
use simfeed::cache::{PoolCache, PoolCacheConfig, PoolKey, PoolStatus};
use simfeed::types::PersonaType;
use tokio::sync::Semaphore;

/// Counts calls and holds each fetch until the gate has a permit.
struct CountingProvider {
    calls: AtomicUsize,
    gate: Semaphore,
}

impl CountingProvider {
    fn open() -> Arc<Self> {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    fn closed() -> Arc<Self> {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(permits),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolProvider for CountingProvider {
    async fn fetch_avatar_pool(&self, persona: PersonaType) -> Result<Vec<String>, PoolFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(PoolFetchError::unavailable)?;
        Ok((1..=4)
            .map(|i| format!("https://cdn.example.com/avatars/{persona}/{i}.jpg"))
            .collect())
    }

    async fn fetch_image_pool(&self, topic: &str) -> Result<Vec<String>, PoolFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![format!("https://cdn.example.com/images/{topic}.jpg")])
    }
}

fn male() -> PoolKey {
    PoolKey::Avatar(PersonaType::Male)
}

async fn wait_for_status(cache: &PoolCache, key: &PoolKey, status: PoolStatus) {
    for _ in 0..200 {
        if cache.status(key) == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("pool {key} never reached {status:?}");
}

#[tokio::test]
async fn concurrent_requests_share_one_fetch() {
    let provider = CountingProvider::open();
    let cache = PoolCache::new(PoolCacheConfig::default(), provider.clone());

    let (male_a, male_b) = (male(), male());
    let (first, second) = tokio::join!(cache.get_pool(&male_a), cache.get_pool(&male_b));
    let first = first.expect("first caller gets the pool");
    let second = second.expect("second caller gets the pool");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn many_waiters_on_a_slow_fetch_share_the_result() {
    let provider = CountingProvider::closed();
    let cache = Arc::new(PoolCache::new(PoolCacheConfig::default(), provider.clone()));

    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_pool(&male()).await })
        })
        .collect();

    wait_for_status(&cache, &male(), PoolStatus::Pending).await;
    provider.gate.add_permits(1);

    let mut pools = Vec::new();
    for waiter in waiters {
        pools.push(waiter.await.expect("join").expect("pool"));
    }
    assert!(pools.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn fetch_survives_caller_cancellation() {
    let provider = CountingProvider::closed();
    let cache = Arc::new(PoolCache::new(PoolCacheConfig::default(), provider.clone()));

    let caller = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get_pool(&male()).await })
    };
    wait_for_status(&cache, &male(), PoolStatus::Pending).await;

    caller.abort();
    assert!(caller.await.is_err_and(|err| err.is_cancelled()));

    provider.gate.add_permits(1);
    wait_for_status(&cache, &male(), PoolStatus::Ready).await;

    let pool = cache.peek(&male()).expect("populated without any caller");
    assert_eq!(pool.len(), 4);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn keys_are_cached_independently() {
    let provider = CountingProvider::open();
    let cache = PoolCache::new(PoolCacheConfig::default(), provider.clone());

    let male_pool = cache.get_pool(&male()).await.expect("male");
    let female_pool = cache
        .get_pool(&PoolKey::Avatar(PersonaType::Female))
        .await
        .expect("female");
    let travel = cache
        .get_pool(&PoolKey::Image("travel".to_string()))
        .await
        .expect("travel");

    assert_ne!(male_pool[0], female_pool[0]);
    assert_eq!(travel.len(), 1);
    assert_eq!(provider.calls(), 3);

    cache.get_pool(&male()).await.expect("cached");
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn prefetch_starts_a_fetch_without_waiting() {
    let provider = CountingProvider::closed();
    let cache = PoolCache::new(PoolCacheConfig::default(), provider.clone());

    cache.prefetch(&male());
    assert_eq!(cache.status(&male()), PoolStatus::Pending);
    assert!(cache.peek(&male()).is_none());

    cache.prefetch(&male());
    provider.gate.add_permits(1);
    wait_for_status(&cache, &male(), PoolStatus::Ready).await;
    assert_eq!(provider.calls(), 1);
}
