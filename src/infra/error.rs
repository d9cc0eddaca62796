use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("feed document `{path}`: {reason}")]
    Feed { path: String, reason: FeedError },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn feed(path: impl Into<String>, reason: FeedError) -> Self {
        Self::Feed {
            path: path.into(),
            reason,
        }
    }
}

/// Why a feed document was rejected.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("post at index {index} has a blank id")]
    BlankId { index: usize },
    #[error("duplicate post id `{id}`")]
    DuplicateId { id: String },
}
