//! # OEIS client
//!
//! A client for the On-Line Encyclopedia of Integer Sequences: look up entries
//! by A-number, search the catalog, and read b-files, with responses parsed into
//! typed, immutable records.
//!
//! ## Architecture
//!
//! - [`client`]: [`SequenceClient`], the async entry point
//! - [`blocking`]: [`BlockingClient`], a synchronous wrapper
//! - [`models`]: A-numbers, queries, sequence records and b-files
//! - [`sources`]: the [`Source`] trait, the HTTP implementation and a mock
//! - [`utils`]: HTTP client, retry and rate limiting helpers
//! - [`config`]: configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use oeis_client::SequenceClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), oeis_client::SourceError> {
//! let client = SequenceClient::new()?;
//! let fibonacci = client.fetch_by_id("A000045").await?;
//! assert_eq!(fibonacci.terms()[7], num_bigint::BigInt::from(13));
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use blocking::BlockingClient;
pub use client::SequenceClient;
pub use models::{find_references, Query, SequenceId, SequenceRecord};
pub use sources::{Source, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
