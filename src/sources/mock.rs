//! Mock source for testing purposes.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{Query, SearchPage, SequenceRecord, PAGE_SIZE};
use crate::sources::{Source, SourceError};

/// A mock source that pages through a fixed list of records.
///
/// Id lookups return the records with that id; text searches return every
/// record, `PAGE_SIZE` at a time. Each `search_page` call is counted.
#[derive(Debug, Default)]
pub struct MockSource {
    records: Mutex<Vec<SequenceRecord>>,
    failure: Mutex<Option<(usize, SourceError)>>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a new mock source with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source serving the given records.
    pub fn with_records(records: Vec<SequenceRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Replace the records served.
    pub fn set_records(&self, records: Vec<SequenceRecord>) {
        let mut guard = self.records.lock().unwrap();
        *guard = records;
    }

    /// Fail the `call`-th request (0-based) with `error`.
    pub fn fail_on_call(&self, call: usize, error: SourceError) {
        let mut guard = self.failure.lock().unwrap();
        *guard = Some((call, error));
    }

    /// Number of `search_page` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search_page(&self, query: &Query, start: usize) -> Result<SearchPage, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((fail_at, error)) = &*self.failure.lock().unwrap() {
            if *fail_at == call {
                return Err(error.clone());
            }
        }

        query.to_param()?;
        let records = self.records.lock().unwrap();
        let matching: Vec<SequenceRecord> = match query {
            Query::Id(id) => records.iter().filter(|r| r.id() == *id).cloned().collect(),
            Query::Text(_) => records.clone(),
        };

        let total = matching.len();
        let page = matching.into_iter().skip(start).take(PAGE_SIZE).collect();
        Ok(SearchPage {
            records: page,
            start,
            total: Some(total),
        })
    }
}

/// Helper function to create a record for testing.
pub fn make_record(number: u32, name: &str, terms: &[i64]) -> SequenceRecord {
    let data = terms
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",");
    SequenceRecord::from_json(json!({
        "number": number,
        "name": name,
        "data": data,
        "offset": "0,1",
        "keyword": "nonn",
    }))
    .expect("mock record should be well formed")
}
