//! Error types for infrastructure failures.
//!
//! Validation failures are never errors: checks report them as issues on the
//! record's outcome. The types here cover collaborators that could not answer
//! and configuration that could not be loaded; they abort the batch.

use std::path::PathBuf;

use thiserror::Error;

/// A collaborator (lookup, query or persistence service) failed to answer.
#[derive(Debug, Error)]
#[error("{service} unavailable: {message}")]
pub struct ServiceError {
    pub service: &'static str,
    pub message: String,
}

impl ServiceError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// Fatal error raised while validating or importing a batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    #[error("{check} check could not complete: {source}")]
    Service {
        check: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("failed to persist record {uid}: {source}")]
    Persist {
        uid: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to build validation thread pool: {0}")]
    ThreadPool(String),
}

impl ValidateError {
    pub(crate) fn service(check: &'static str, source: ServiceError) -> Self {
        Self::Service { check, source }
    }
}

/// Import options could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML options {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid import options: {message}")]
    Invalid { message: String },
}
