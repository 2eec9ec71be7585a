//! OEIS source implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::models::{BFile, Query, SearchPage, SequenceId, SequenceRecord};
use crate::sources::{Source, SourceError};
use crate::utils::{with_retry, HttpClient, RateLimiter, RetryConfig};

/// OEIS source
///
/// Uses the JSON output of the search endpoint and the plain-text b-files.
#[derive(Debug, Clone)]
pub struct OeisSource {
    client: HttpClient,
    limiter: RateLimiter,
    retry: RetryConfig,
}

impl OeisSource {
    /// Create a source against the public endpoint with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ClientConfig::default())
    }

    /// Create a source from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::from_config(config)?,
            limiter: RateLimiter::from_rate(config.requests_per_second),
            retry: RetryConfig::from(&config.retry),
        })
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            limiter: RateLimiter::unlimited(),
            retry: RetryConfig::disabled(),
        }
    }

    pub fn base_url(&self) -> &Url {
        self.client.base_url()
    }

    /// Build the search URL for one page
    fn search_url(&self, query: &Query, start: usize) -> Result<Url, SourceError> {
        let param = query.to_param()?;
        let mut url = self.client.url("search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &param).append_pair("fmt", "json");
            if start > 0 {
                pairs.append_pair("start", &start.to_string());
            }
        }
        Ok(url)
    }

    /// Build the b-file URL, e.g. `/A000045/b000045.txt`
    fn b_file_url(&self, id: SequenceId) -> Result<Url, SourceError> {
        self.client.url(&format!("{}/{}", id, id.b_file_name()))
    }

    /// GET a URL and return the body text
    ///
    /// 404 becomes `NotFound`, any other non-success status becomes `Transport`.
    async fn get_text(&self, url: &Url) -> Result<String, SourceError> {
        with_retry(self.retry, move || async move {
            self.limiter.until_ready().await;
            tracing::debug!("GET {}", url);

            let response = self
                .client
                .client()
                .get(url.clone())
                .send()
                .await
                .map_err(|e| SourceError::Transport(format!("Failed to reach OEIS: {}", e)))?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(SourceError::NotFound(format!("{} returned 404", url.path())));
            }
            if !status.is_success() {
                return Err(SourceError::Transport(format!(
                    "OEIS returned status: {}",
                    status
                )));
            }

            response
                .text()
                .await
                .map_err(|e| SourceError::Transport(format!("Failed to read response: {}", e)))
        })
        .await
    }

    /// Parse a search response body into a page
    ///
    /// Accepts a bare array of entries, `null`, or the `{count, start, results}`
    /// envelope. Any malformed entry fails the whole page. An envelope with a
    /// positive count but no results means the query matched too many entries
    /// to list and is rejected as `InvalidQuery`.
    pub(crate) fn parse_search_body(body: &str, start: usize) -> Result<SearchPage, SourceError> {
        let parsed: Option<SearchBody> = serde_json::from_str(body)
            .map_err(|e| SourceError::Parse(format!("Unexpected search response: {}", e)))?;

        let (entries, start, total) = match parsed {
            None => (Vec::new(), start, Some(0)),
            Some(SearchBody::Entries(entries)) => (entries, start, None),
            Some(SearchBody::Envelope {
                count,
                start: reported_start,
                results,
            }) => {
                let results = match results {
                    Some(results) => results,
                    None if count == 0 => Vec::new(),
                    None => {
                        return Err(SourceError::InvalidQuery(format!(
                            "Too many results ({}) to list, refine the query",
                            count
                        )))
                    }
                };
                (results, reported_start.unwrap_or(start), Some(count))
            }
        };

        let records = entries
            .into_iter()
            .map(SequenceRecord::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchPage {
            records,
            start,
            total,
        })
    }
}

#[async_trait]
impl Source for OeisSource {
    fn id(&self) -> &str {
        "oeis"
    }

    fn name(&self) -> &str {
        "OEIS"
    }

    async fn search_page(&self, query: &Query, start: usize) -> Result<SearchPage, SourceError> {
        let url = self.search_url(query, start)?;
        let body = self.get_text(&url).await?;
        let page = Self::parse_search_body(&body, start)?;

        tracing::debug!(
            "OEIS search {:?} start={} returned {} entries (total {:?})",
            query,
            start,
            page.records.len(),
            page.total
        );
        Ok(page)
    }

    async fn b_file(&self, id: SequenceId) -> Result<BFile, SourceError> {
        let url = self.b_file_url(id)?;
        let body = self.get_text(&url).await.map_err(|e| match e {
            SourceError::NotFound(_) => SourceError::NotFound(format!("No b-file for {}", id)),
            other => other,
        })?;
        BFile::parse(id, &body)
    }
}

// ===== OEIS API Types =====

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchBody {
    Entries(Vec<Value>),
    Envelope {
        count: usize,
        start: Option<usize>,
        results: Option<Vec<Value>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fibonacci_entry;
    use serde_json::json;

    fn source() -> OeisSource {
        OeisSource::new().unwrap()
    }

    #[test]
    fn test_search_url() {
        let url = source().search_url(&Query::from("1,2,3,5,8"), 0).unwrap();
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "1,2,3,5,8".to_string()),
                ("fmt".to_string(), "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_with_start_and_id() {
        let id = SequenceId::new(45).unwrap();
        let url = source().search_url(&Query::Id(id), 20).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "id:A000045".to_string())));
        assert!(pairs.contains(&("start".to_string(), "20".to_string())));
    }

    #[test]
    fn test_search_url_rejects_empty_query() {
        assert!(matches!(
            source().search_url(&Query::from(""), 0),
            Err(SourceError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_b_file_url() {
        let url = source().b_file_url(SequenceId::new(45).unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://oeis.org/A000045/b000045.txt");
    }

    #[test]
    fn test_parse_array_body() {
        let body = json!([fibonacci_entry()]).to_string();
        let page = OeisSource::parse_search_body(&body, 0).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id().number(), 45);
        assert_eq!(page.total, None);
    }

    #[test]
    fn test_parse_envelope_body() {
        let body = json!({
            "greeting": "Greetings from The On-Line Encyclopedia of Integer Sequences!",
            "query": "id:A000045",
            "count": 1,
            "start": 0,
            "results": [fibonacci_entry()]
        })
        .to_string();
        let page = OeisSource::parse_search_body(&body, 0).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total, Some(1));
    }

    #[test]
    fn test_parse_empty_bodies() {
        let page = OeisSource::parse_search_body("null", 0).unwrap();
        assert!(page.records.is_empty());

        let body = json!({"count": 0, "start": 0, "results": null}).to_string();
        let page = OeisSource::parse_search_body(&body, 0).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, Some(0));
    }

    #[test]
    fn test_parse_too_many_results() {
        let body = json!({"count": 5000, "start": 0, "results": null}).to_string();
        let err = OeisSource::parse_search_body(&body, 0).unwrap_err();
        assert!(matches!(err, SourceError::InvalidQuery(msg) if msg.contains("5000")));

        let body = json!({"count": 5000, "start": 0}).to_string();
        assert!(matches!(
            OeisSource::parse_search_body(&body, 0),
            Err(SourceError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_parse_unexpected_bodies() {
        for body in ["", "<html>Bad request</html>", "{\"greeting\": \"hi\"}", "42"] {
            assert!(
                matches!(
                    OeisSource::parse_search_body(body, 0),
                    Err(SourceError::Parse(_))
                ),
                "{:?} should fail",
                body
            );
        }
    }

    #[test]
    fn test_one_bad_entry_fails_page() {
        let mut broken = fibonacci_entry();
        broken.as_object_mut().unwrap().remove("data");
        let body = json!([fibonacci_entry(), broken]).to_string();
        assert!(matches!(
            OeisSource::parse_search_body(&body, 0),
            Err(SourceError::Parse(_))
        ));
    }
}
