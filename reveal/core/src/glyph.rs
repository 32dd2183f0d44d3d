//! Glyph Splitting
//!
//! Turns quote text into individual display units for the staggered
//! character fade-in. Each `char` is one unit; there is no normalization and
//! no grapheme clustering, so multi-codepoint glyphs (flags, ZWJ emoji,
//! combining marks) reveal one codepoint at a time.

use std::time::Duration;

/// Split a string into single-character display units, in order
///
/// Whitespace and punctuation are kept as units of their own.
#[must_use]
pub fn split_glyphs(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}

/// Ordered display units derived from one quote text
///
/// A new sequence is built for every quote; it is never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphSequence {
    units: Vec<String>,
}

impl GlyphSequence {
    /// Build the sequence for a display text
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            units: split_glyphs(text),
        }
    }

    /// The display units
    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Number of units
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether there are no units
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate over the units
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(String::as_str)
    }

    /// Reassemble the original text
    #[must_use]
    pub fn text(&self) -> String {
        self.units.concat()
    }

    /// Fade-in start offset of the unit at `index`
    #[must_use]
    pub fn stagger_offset(index: usize, stagger: Duration) -> Duration {
        stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Time until the last unit has finished fading in
    #[must_use]
    pub fn reveal_duration(&self, stagger: Duration, fade: Duration) -> Duration {
        match self.units.len() {
            0 => Duration::ZERO,
            n => Self::stagger_offset(n - 1, stagger) + fade,
        }
    }
}

impl<'a> IntoIterator for &'a GlyphSequence {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_preserves_order_and_whitespace() {
        assert_eq!(
            split_glyphs("a b,"),
            vec!["a".to_string(), " ".into(), "b".into(), ",".into()]
        );
    }

    #[test]
    fn test_concatenation_round_trips() {
        for text in [
            "Be water",
            "  leading and trailing  ",
            "¿Qué tal? — ça va!",
            "tab\tnew\nline",
            "emoji 🌊 too",
        ] {
            let glyphs = split_glyphs(text);
            assert_eq!(glyphs.concat(), text);
            assert_eq!(glyphs.len(), text.chars().count());
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(split_glyphs("").is_empty());
        assert!(GlyphSequence::from_text("").is_empty());
    }

    #[test]
    fn test_multi_codepoint_glyph_splits_per_char() {
        // e + combining acute accent
        let glyphs = split_glyphs("e\u{301}");
        assert_eq!(glyphs.len(), 2);
    }

    #[test]
    fn test_sequence_from_display_text() {
        let sequence = GlyphSequence::from_text(" Be water\"");
        assert_eq!(sequence.len(), 10);
        assert_eq!(sequence.units()[0], " ");
        assert_eq!(sequence.units()[9], "\"");
        assert_eq!(sequence.text(), " Be water\"");
    }

    #[test]
    fn test_stagger_offsets() {
        let stagger = Duration::from_millis(50);
        assert_eq!(GlyphSequence::stagger_offset(0, stagger), Duration::ZERO);
        assert_eq!(
            GlyphSequence::stagger_offset(4, stagger),
            Duration::from_millis(200)
        );
    }

    #[test]
    fn test_reveal_duration() {
        let sequence = GlyphSequence::from_text("abcd");
        assert_eq!(
            sequence.reveal_duration(Duration::from_millis(50), Duration::from_millis(500)),
            Duration::from_millis(650)
        );
        assert_eq!(
            GlyphSequence::default()
                .reveal_duration(Duration::from_millis(50), Duration::from_millis(500)),
            Duration::ZERO
        );
    }
}
