//! Sequence sources behind a trait-based seam.
//!
//! This module defines the [`Source`] trait that the client talks to. The
//! [`OeisSource`] implementation queries the public OEIS endpoints over HTTP;
//! [`MockSource`] serves canned records from memory and is what the client's
//! own tests run against.
//!
//! # Endpoints
//!
//! - `GET {base}/search?q=<query>&fmt=json&start=<n>`: one page of entries
//! - `GET {base}/Annnnnn/bnnnnnn.txt`: the b-file of an entry
//!
//! The base URL defaults to `https://oeis.org` and can be overridden through
//! [`ClientConfig`](crate::config::ClientConfig) or `OEIS_BASE_URL`.

pub mod mock;
mod oeis;

pub use mock::MockSource;
pub use oeis::OeisSource;

use crate::models::{BFile, InvalidId, Query, SearchPage, SequenceId};
use async_trait::async_trait;

/// Interface to a remote sequence catalog.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Implement `id`, `name` and `search_page`
/// 3. Implement `b_file` if the catalog publishes extended term listings
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Short identifier for this source (e.g. "oeis")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch one page of entries matching `query`, starting at result `start`
    ///
    /// Exactly one request per call. Entries keep the order the catalog returned.
    async fn search_page(&self, query: &Query, start: usize) -> Result<SearchPage, SourceError>;

    /// Fetch the extended term listing of an entry
    async fn b_file(&self, _id: SequenceId) -> Result<BFile, SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Errors that can occur when talking to a source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The query was valid but nothing matched
    #[error("Not found: {0}")]
    NotFound(String),

    /// DNS, connection, timeout or HTTP status failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input rejected before any request was made
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,
}

impl SourceError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Transport(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<InvalidId> for SourceError {
    fn from(err: InvalidId) -> Self {
        SourceError::InvalidQuery(err.to_string())
    }
}

impl From<crate::config::ConfigError> for SourceError {
    fn from(err: crate::config::ConfigError) -> Self {
        SourceError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_errors_are_transient() {
        assert!(SourceError::Transport("connection refused".to_string()).is_transient());
        assert!(!SourceError::NotFound("A999999".to_string()).is_transient());
        assert!(!SourceError::Parse("invalid json".to_string()).is_transient());
        assert!(!SourceError::InvalidQuery("empty".to_string()).is_transient());
    }

    #[test]
    fn test_invalid_id_becomes_invalid_query() {
        let err: SourceError = "A-1".parse::<SequenceId>().unwrap_err().into();
        assert!(matches!(err, SourceError::InvalidQuery(msg) if msg.contains("A-1")));
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let err: SourceError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
