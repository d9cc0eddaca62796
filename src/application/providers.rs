//! Pool provider traits describing where avatar and image pools come from.

use async_trait::async_trait;
use simfeed_types::PersonaType;
use thiserror::Error;

/// Failure reported by a pool provider.
///
/// Cloneable so one shared in-flight fetch can hand the same error to every
/// waiting caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolFetchError {
    #[error("no pool available for `{key}`")]
    NotFound { key: String },
    #[error("pool source unavailable: {0}")]
    Unavailable(String),
    #[error("pool source returned invalid data: {0}")]
    Invalid(String),
    #[error("pool fetch aborted: {0}")]
    Aborted(String),
}

impl PoolFetchError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Source of candidate pools. Each call returns an ordered sequence of
/// absolute resource URLs or fails.
#[async_trait]
pub trait PoolProvider: Send + Sync {
    async fn fetch_avatar_pool(&self, persona: PersonaType)
    -> Result<Vec<String>, PoolFetchError>;

    async fn fetch_image_pool(&self, topic: &str) -> Result<Vec<String>, PoolFetchError>;
}
