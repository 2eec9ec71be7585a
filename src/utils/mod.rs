//! Utility modules supporting the client.
//!
//! - [`HttpClient`]: reqwest client bound to the configured base URL
//! - [`RateLimiter`]: optional client-side request rate cap
//! - [`RetryConfig`]: configuration for retry logic with exponential backoff
//! - [`with_retry`]: execute an operation with retry on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use oeis_client::utils::{with_retry, RetryConfig};
//! use oeis_client::sources::SourceError;
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let data = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod rate_limit;
mod retry;

pub use http::{HttpClient, DEFAULT_USER_AGENT};
pub use rate_limit::RateLimiter;
pub use retry::{api_retry_config, with_retry, RetryConfig};
