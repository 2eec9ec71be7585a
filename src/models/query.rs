//! Lookup and search queries.

use std::fmt::Display;

use super::id::SequenceId;
use crate::sources::SourceError;

/// Number of entries the service returns per search page
pub const PAGE_SIZE: usize = 10;

/// A single request against the catalog: an id lookup or a text search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Look up one entry by its A-number
    Id(SequenceId),
    /// Free-text search, in the service's query syntax
    Text(String),
}

impl Query {
    /// Create an id lookup
    pub fn id(id: SequenceId) -> Self {
        Query::Id(id)
    }

    /// Create a text search
    pub fn text(text: impl Into<String>) -> Self {
        Query::Text(text.into())
    }

    /// Search for entries containing the given terms, in order
    pub fn terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let joined = terms
            .into_iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Query::Text(joined)
    }

    /// Render the `q` parameter sent to the service
    ///
    /// Fails for empty or whitespace-only text.
    pub fn to_param(&self) -> Result<String, SourceError> {
        match self {
            Query::Id(id) => Ok(format!("id:{}", id)),
            Query::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(SourceError::InvalidQuery(
                        "Search term must be non-empty".to_string(),
                    ));
                }
                Ok(trimmed.to_string())
            }
        }
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::Text(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::Text(text)
    }
}

impl From<SequenceId> for Query {
    fn from(id: SequenceId) -> Self {
        Query::Id(id)
    }
}

/// One page of search results, in the order the service returned them
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Records on this page
    pub records: Vec<super::SequenceRecord>,
    /// Offset of the first record within the full result list
    pub start: usize,
    /// Total number of matches, when the service reports it
    pub total: Option<usize>,
}

impl SearchPage {
    /// Whether no further page can follow this one
    pub fn is_last(&self) -> bool {
        if self.records.len() < PAGE_SIZE {
            return true;
        }
        match self.total {
            Some(total) => self.start + self.records.len() >= total,
            None => false,
        }
    }
}
