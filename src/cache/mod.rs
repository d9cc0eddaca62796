//! Session-scoped pool cache.
//!
//! Avatar pools (by persona type) and image pools (by topic) are fetched at
//! most once per key at a time and reused across every post that needs
//! them. A cache instance lives for one session and is passed by reference
//! to whoever resolves posts.
//!
//! ## Configuration
//!
//! ```toml
//! [pools]
//! max_fetch_attempts = 3
//! ```

mod config;
mod keys;
mod lock;
mod pool;

pub use config::PoolCacheConfig;
pub use keys::PoolKey;
pub use pool::{Pool, PoolCache, PoolStatus};

pub(crate) use lock::mutex_lock;
