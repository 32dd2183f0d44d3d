//! HTTP Quote Source
//!
//! Fetches a batch of quotes with a single parameterless GET.
//!
//! # Response Format
//!
//! ```json
//! { "quotes": [ { "id": 1, "quote": "...", "author": "..." } ], "total": 1454 }
//! ```
//!
//! Extra fields are ignored. A body without a `quotes` collection is malformed.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{FetchError, QuoteSource};
use crate::config::SourceConfig;
use crate::quote::Quote;

/// Envelope around the candidate list
#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    quotes: Option<Vec<Quote>>,
}

/// Parse a response body into candidates
pub(crate) fn parse_candidates(body: &str) -> Result<Vec<Quote>, FetchError> {
    let envelope: QuoteEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    envelope
        .quotes
        .ok_or_else(|| FetchError::Malformed("missing 'quotes' collection".to_string()))
}

/// Quote source backed by an HTTP endpoint
#[derive(Clone, Debug)]
pub struct HttpQuoteSource {
    /// Endpoint URL
    url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpQuoteSource {
    /// Create a new HTTP source
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quote-reveal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    /// Create from `SourceConfig`
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::new(config.url.clone(), config.timeout)
    }

    /// The endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_candidates(&self) -> Result<Vec<Quote>, FetchError> {
        tracing::debug!(url = %self.url, "Requesting quotes");

        let response = self.http_client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let candidates = parse_candidates(&body)?;

        tracing::debug!(count = candidates.len(), "Received quote candidates");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_envelope() {
        let body = r#"{
            "quotes": [
                {"id": 1, "quote": "Be water", "author": "Bruce Lee"},
                {"id": 2, "quote": "Stay hungry", "author": "Steve Jobs"}
            ],
            "total": 2, "skip": 0, "limit": 30
        }"#;

        let candidates = parse_candidates(body).unwrap();
        assert_eq!(
            candidates,
            vec![
                Quote::new("Be water", "Bruce Lee"),
                Quote::new("Stay hungry", "Steve Jobs"),
            ]
        );
    }

    #[test]
    fn test_missing_collection_is_malformed() {
        let err = parse_candidates(r#"{"total": 0}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(ref msg) if msg.contains("quotes")));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse_candidates("<html>502</html>"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_collection_parses() {
        // Selection reports the empty batch, not the parser
        assert!(parse_candidates(r#"{"quotes": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = SourceConfig::default();
        let source = HttpQuoteSource::from_config(&config).unwrap();
        assert_eq!(source.url(), config.url);
        assert_eq!(source.name(), "http");
    }
}
