//! Pool cache configuration.

use std::num::NonZeroU32;

const DEFAULT_MAX_FETCH_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);

#[derive(Debug, Clone)]
pub struct PoolCacheConfig {
    /// Fetch attempts per key before a failed entry stops retrying on its
    /// own. `PoolCache::forget_failures` re-arms it.
    pub max_fetch_attempts: NonZeroU32,
}

impl Default for PoolCacheConfig {
    fn default() -> Self {
        Self {
            max_fetch_attempts: DEFAULT_MAX_FETCH_ATTEMPTS,
        }
    }
}

impl From<&crate::config::PoolSettings> for PoolCacheConfig {
    fn from(settings: &crate::config::PoolSettings) -> Self {
        Self {
            max_fetch_attempts: settings.max_fetch_attempts,
        }
    }
}

impl PoolCacheConfig {
    pub fn with_max_fetch_attempts(max_fetch_attempts: NonZeroU32) -> Self {
        Self { max_fetch_attempts }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::PoolSettings;

    #[test]
    fn default_values() {
        assert_eq!(PoolCacheConfig::default().max_fetch_attempts.get(), 3);
    }

    #[test]
    fn attempts_come_from_validated_settings() {
        let settings = PoolSettings {
            manifest: Some(PathBuf::from("pools.toml")),
            max_fetch_attempts: NonZeroU32::new(5).expect("non-zero"),
            placeholder_avatar_url: "/static/avatars/placeholder.svg".to_string(),
        };
        assert_eq!(PoolCacheConfig::from(&settings).max_fetch_attempts.get(), 5);
    }
}
