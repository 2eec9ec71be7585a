//! The sequence client: id lookups, searches and b-files.

use async_stream::try_stream;
use futures_util::stream::Stream;
use futures_util::TryStreamExt;
use std::pin::Pin;

use crate::config::ClientConfig;
use crate::models::{BFile, IntoSequenceId, Query, SequenceRecord};
use crate::sources::{OeisSource, Source, SourceError};

/// Lazy stream of search results
pub type RecordStream<'a> =
    Pin<Box<dyn Stream<Item = Result<SequenceRecord, SourceError>> + Send + 'a>>;

/// Client for a sequence catalog
///
/// Holds no state between calls. Every operation goes straight to the
/// underlying [`Source`] and returns its failures unchanged.
#[derive(Debug, Clone)]
pub struct SequenceClient<S: Source = OeisSource> {
    source: S,
}

impl SequenceClient<OeisSource> {
    /// Client for the public OEIS with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ClientConfig::default())
    }

    /// Client configured from the default config file and `OEIS_*` variables
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, SourceError> {
        Ok(Self::with_source(OeisSource::from_config(config)?))
    }
}

impl<S: Source> SequenceClient<S> {
    /// Client over any source implementation
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch one entry by A-number
    ///
    /// Accepts `45`, `"A000045"`, `"a45"` or a [`SequenceId`](crate::models::SequenceId).
    pub async fn fetch_by_id(&self, id: impl IntoSequenceId) -> Result<SequenceRecord, SourceError> {
        let id = id.into_sequence_id()?;
        let page = self.source.search_page(&Query::Id(id), 0).await?;

        if page.records.is_empty() {
            return Err(SourceError::NotFound(format!("Key {} missing from OEIS", id)));
        }

        page.records
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| {
                SourceError::Parse(format!("Response for {} did not contain that entry", id))
            })
    }

    /// Whether an entry exists
    pub async fn exists(&self, id: impl IntoSequenceId) -> Result<bool, SourceError> {
        match self.fetch_by_id(id).await {
            Ok(_) => Ok(true),
            Err(SourceError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Search the catalog, yielding at most `limit` records in the order received
    ///
    /// Pages are requested as the stream is polled. The stream ends at the first
    /// error. Empty queries and a zero limit are rejected before any request.
    pub fn search(
        &self,
        query: impl Into<Query>,
        limit: usize,
    ) -> Result<RecordStream<'_>, SourceError> {
        let query = query.into();
        query.to_param()?;
        if limit == 0 {
            return Err(SourceError::InvalidQuery(
                "Result limit must be positive".to_string(),
            ));
        }
        Ok(Box::pin(paginate(&self.source, query, limit)))
    }

    /// Run a search to completion
    ///
    /// Returns every record, or the first error and nothing else.
    pub async fn search_collect(
        &self,
        query: impl Into<Query>,
        limit: usize,
    ) -> Result<Vec<SequenceRecord>, SourceError> {
        self.search(query, limit)?.try_collect().await
    }

    /// Fetch the extended term listing of an entry
    pub async fn b_file(&self, id: impl IntoSequenceId) -> Result<BFile, SourceError> {
        let id = id.into_sequence_id()?;
        self.source.b_file(id).await
    }
}

fn paginate<'a, S: Source>(
    source: &'a S,
    query: Query,
    limit: usize,
) -> impl Stream<Item = Result<SequenceRecord, SourceError>> + Send + 'a {
    try_stream! {
        let mut start = 0;
        let mut emitted = 0;

        while emitted < limit {
            let page = source.search_page(&query, start).await?;
            let fetched = page.records.len();
            let last = page.is_last();

            for record in page.records.into_iter().take(limit - emitted) {
                emitted += 1;
                yield record;
            }

            if last || fetched == 0 {
                break;
            }
            start += fetched;
        }

        tracing::debug!("Search {:?} finished after {} records", query, emitted);
    }
}
