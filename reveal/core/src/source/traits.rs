//! Quote Source Traits
//!
//! Trait definitions for quote providers. The sequencer only sees this
//! interface, so the HTTP source, the offline list and test doubles are
//! interchangeable.

use async_trait::async_trait;
use thiserror::Error;

use crate::quote::Quote;

/// Failure retrieving a quote
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or transport failure
    #[error("Quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The source answered with a non-success status
    #[error("Quote source returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response could not be understood
    #[error("Malformed quote response: {0}")]
    Malformed(String),

    /// The response held no candidates
    #[error("Quote source returned no candidates")]
    Empty,
}

/// Quote provider
///
/// Implement this trait to add another place quotes can come from.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short name for logs (e.g., "http", "offline")
    fn name(&self) -> &str;

    /// Fetch a batch of candidate quotes
    async fn fetch_candidates(&self) -> Result<Vec<Quote>, FetchError>;
}

#[async_trait]
impl<T: QuoteSource + ?Sized> QuoteSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_candidates(&self) -> Result<Vec<Quote>, FetchError> {
        (**self).fetch_candidates().await
    }
}

#[async_trait]
impl<T: QuoteSource + ?Sized> QuoteSource for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_candidates(&self) -> Result<Vec<Quote>, FetchError> {
        (**self).fetch_candidates().await
    }
}
