//! Quote Data Model
//!
//! A quote is replaced wholesale on every fetch and never edited in place.

use serde::{Deserialize, Serialize};

/// A quotation and its author
///
/// The empty quote (`Quote::default()`) is what the display holds before the
/// first load and while a reload is in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quotation itself
    #[serde(rename = "quote")]
    pub text: String,
    /// Who said it
    pub author: String,
}

impl Quote {
    /// Create a new quote
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// Whether this is the empty placeholder quote
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.author.is_empty()
    }

    /// Text as shown on screen: a leading space and a trailing quotation mark
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(" {}\"", self.text)
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Quote::default().is_empty());
        assert!(!Quote::new("Be water", "Bruce Lee").is_empty());
    }

    #[test]
    fn test_display_text_wraps_quote() {
        let quote = Quote::new("Be water", "Bruce Lee");
        assert_eq!(quote.display_text(), " Be water\"");
        assert_eq!(Quote::default().display_text(), " \"");
    }

    #[test]
    fn test_deserializes_source_field_names() {
        let json = r#"{"id": 7, "quote": "Be water", "author": "Bruce Lee"}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote, Quote::new("Be water", "Bruce Lee"));
    }
}
