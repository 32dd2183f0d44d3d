//! Fixed Quote Source
//!
//! Serves a fixed candidate list; used for offline mode.

use async_trait::async_trait;

use super::traits::{FetchError, QuoteSource};
use crate::quote::Quote;

/// Quotes served when no network source is wanted
const BUILTIN_QUOTES: &[(&str, &str)] = &[
    ("Be water, my friend.", "Bruce Lee"),
    ("The only way out is through.", "Robert Frost"),
    ("Simplicity is the ultimate sophistication.", "Leonardo da Vinci"),
    ("Well done is better than well said.", "Benjamin Franklin"),
    ("It always seems impossible until it's done.", "Nelson Mandela"),
    ("What we think, we become.", "Buddha"),
];

/// Source backed by an in-memory list
#[derive(Clone, Debug)]
pub struct FixedQuoteSource {
    candidates: Vec<Quote>,
}

impl FixedQuoteSource {
    /// Create a source serving `candidates`
    #[must_use]
    pub fn new(candidates: Vec<Quote>) -> Self {
        Self { candidates }
    }

    /// Create a source serving the built-in offline quotes
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_QUOTES
                .iter()
                .map(|(text, author)| Quote::new(*text, *author))
                .collect(),
        )
    }

    /// The candidates this source serves
    #[must_use]
    pub fn candidates(&self) -> &[Quote] {
        &self.candidates
    }
}

impl Default for FixedQuoteSource {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl QuoteSource for FixedQuoteSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch_candidates(&self) -> Result<Vec<Quote>, FetchError> {
        if self.candidates.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(self.candidates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_serves_all_quotes() {
        let source = FixedQuoteSource::builtin();
        let candidates = source.fetch_candidates().await.unwrap();
        assert_eq!(candidates.len(), BUILTIN_QUOTES.len());
        assert!(candidates.iter().all(|q| !q.text.is_empty() && !q.author.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_list_fails() {
        let source = FixedQuoteSource::new(Vec::new());
        assert!(matches!(
            source.fetch_candidates().await,
            Err(FetchError::Empty)
        ));
    }
}
