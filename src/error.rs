//! Errors raised by a single search cycle.
//!
//! None of these are fatal: every variant is scoped to one query and the
//! palette stays usable after any of them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The workspace file index has not finished its initial load
    #[error("file index is still loading")]
    NotReady,

    /// A file-scoped search ran with no active file
    #[error("no active file to search in")]
    NoActiveFile,

    /// An `.ignore`/`.gitignore` file could not be read or decoded
    #[error("failed to read ignore file {}: {source}", path.display())]
    IgnoreFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A host provider (file index, symbols, documents) rejected the call
    #[error("{provider} provider failed: {message}")]
    ProviderFailure {
        provider: &'static str,
        message: String,
    },
}

impl SearchError {
    pub fn provider(provider: &'static str, message: impl std::fmt::Display) -> Self {
        Self::ProviderFailure {
            provider,
            message: message.to_string(),
        }
    }

    /// Whether the same query should simply be retried shortly
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::NotReady)
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
