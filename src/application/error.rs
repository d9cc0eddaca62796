use std::error::Error as StdError;

use thiserror::Error;

use crate::{domain::error::DomainError, infra::error::InfraError};

/// Flattened error chain for logging at the process boundary.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    /// Messages joined outermost first.
    pub fn chain(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Short operator-facing summary, independent of the detailed chain.
    pub fn summary(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::Validation { .. }) => "Input could not be processed",
            AppError::Infra(InfraError::Configuration { .. }) => "Configuration is invalid",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start",
            AppError::Infra(InfraError::Io(_)) => "I/O failure",
            AppError::Infra(InfraError::Feed { .. }) => "Feed document is invalid",
            AppError::Unexpected(_) => "Unexpected error occurred",
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_walks_the_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "feed.json missing");
        let error = AppError::from(InfraError::from(io));

        let report = error.report();
        assert_eq!(report.source, "application::error::AppError");
        assert!(report.messages[0].contains("feed.json missing"));
        assert_eq!(error.summary(), "I/O failure");
    }

    #[test]
    fn domain_validation_is_an_input_problem() {
        let error = AppError::from(DomainError::validation("app id must be fb or ig"));
        assert_eq!(error.summary(), "Input could not be processed");
        assert!(error.to_string().contains("app id must be fb or ig"));
    }

    #[test]
    fn configuration_errors_keep_the_offending_key() {
        let error = AppError::from(InfraError::configuration(
            "invalid configuration for `scheduler.step`: must be greater than zero",
        ));
        assert_eq!(error.summary(), "Configuration is invalid");
        assert!(error.report().chain().contains("scheduler.step"));
    }
}
