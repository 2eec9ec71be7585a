//! Blocking client.
//!
//! Runs the async [`SequenceClient`] on a private current-thread runtime, so
//! every call blocks the calling thread until the service answers or the
//! request times out. Must not be used from inside an async runtime.
//!
//! ```rust,no_run
//! use oeis_client::blocking::BlockingClient;
//!
//! # fn main() -> Result<(), oeis_client::sources::SourceError> {
//! let client = BlockingClient::new()?;
//! let fibonacci = client.fetch_by_id("A000045")?;
//! println!("{}: {}", fibonacci.id(), fibonacci.name());
//!
//! for record in client.search("1,1,2,3,5,8", 5)? {
//!     println!("{}", record?.id());
//! }
//! # Ok(())
//! # }
//! ```

use futures_util::StreamExt;
use tokio::runtime::{Builder, Runtime};

use crate::client::{RecordStream, SequenceClient};
use crate::config::ClientConfig;
use crate::models::{BFile, IntoSequenceId, Query, SequenceRecord};
use crate::sources::{OeisSource, SourceError};

/// Synchronous wrapper around [`SequenceClient`]
#[derive(Debug)]
pub struct BlockingClient {
    inner: SequenceClient<OeisSource>,
    runtime: Runtime,
}

impl BlockingClient {
    /// Client for the public OEIS with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ClientConfig::default())
    }

    /// Client configured from the default config file and `OEIS_*` variables
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, SourceError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to start runtime: {}", e)))?;

        let inner = {
            let _guard = runtime.enter();
            SequenceClient::from_config(config)?
        };

        Ok(Self { inner, runtime })
    }

    /// See [`SequenceClient::fetch_by_id`]
    pub fn fetch_by_id(&self, id: impl IntoSequenceId) -> Result<SequenceRecord, SourceError> {
        self.runtime.block_on(self.inner.fetch_by_id(id))
    }

    /// See [`SequenceClient::exists`]
    pub fn exists(&self, id: impl IntoSequenceId) -> Result<bool, SourceError> {
        self.runtime.block_on(self.inner.exists(id))
    }

    /// See [`SequenceClient::search`]; each `next()` blocks until the record is available
    pub fn search(
        &self,
        query: impl Into<Query>,
        limit: usize,
    ) -> Result<SearchIter<'_>, SourceError> {
        let stream = self.inner.search(query, limit)?;
        Ok(SearchIter {
            runtime: &self.runtime,
            stream,
        })
    }

    /// See [`SequenceClient::search_collect`]
    pub fn search_collect(
        &self,
        query: impl Into<Query>,
        limit: usize,
    ) -> Result<Vec<SequenceRecord>, SourceError> {
        self.runtime.block_on(self.inner.search_collect(query, limit))
    }

    /// See [`SequenceClient::b_file`]
    pub fn b_file(&self, id: impl IntoSequenceId) -> Result<BFile, SourceError> {
        self.runtime.block_on(self.inner.b_file(id))
    }
}

/// Blocking iterator over search results
pub struct SearchIter<'a> {
    runtime: &'a Runtime,
    stream: RecordStream<'a>,
}

impl Iterator for SearchIter<'_> {
    type Item = Result<SequenceRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.stream.next())
    }
}

impl std::fmt::Debug for SearchIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_search_rejected_without_runtime_work() {
        let client = BlockingClient::new().unwrap();
        assert!(matches!(
            client.search("  ", 5),
            Err(SourceError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_invalid_id_rejected() {
        let client = BlockingClient::new().unwrap();
        assert!(matches!(
            client.fetch_by_id("A0x"),
            Err(SourceError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_bad_config_rejected() {
        let config = ClientConfig::default().base_url("not a url");
        assert!(matches!(
            BlockingClient::from_config(&config),
            Err(SourceError::Config(_))
        ));
    }
}
