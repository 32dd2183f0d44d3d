//! Reveal Stages and Snapshots
//!
//! The stage is the single source of truth for which animation variants a
//! surface applies; the snapshot is everything a surface reads at an instant.

use serde::{Deserialize, Serialize};

use crate::animation::Rgb;
use crate::glyph::GlyphSequence;
use crate::quote::Quote;

/// Phase of the staged quote/caption reveal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealStage {
    /// Not mounted, nothing requested
    #[default]
    Idle,
    /// Quote requested (or arrived and settling); both reveal flags cleared
    AwaitingQuote,
    /// Text reveal flag set; glyphs fade in while visible
    TextRevealing,
    /// Text fully revealed, caption pending
    TextRevealed,
    /// Caption shown; terminal until the next retrigger
    CaptionRevealed,
}

impl RevealStage {
    /// Whether the text reveal flag is set in this stage
    #[must_use]
    pub fn text_flag(self) -> bool {
        matches!(
            self,
            Self::TextRevealing | Self::TextRevealed | Self::CaptionRevealed
        )
    }

    /// Whether the caption reveal flag is set in this stage
    #[must_use]
    pub fn caption_flag(self) -> bool {
        matches!(self, Self::CaptionRevealed)
    }

    /// Stage name for logs and status lines
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingQuote => "awaiting quote",
            Self::TextRevealing => "revealing text",
            Self::TextRevealed => "text revealed",
            Self::CaptionRevealed => "caption revealed",
        }
    }
}

impl std::fmt::Display for RevealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the presentation layer renders at an instant
#[derive(Clone, Debug, PartialEq)]
pub struct RevealSnapshot {
    /// Fetch-and-reveal cycle this snapshot belongs to
    pub cycle: u64,
    /// Current stage
    pub stage: RevealStage,
    /// Current quote (empty while loading)
    pub quote: Quote,
    /// Display units of the current quote
    pub glyphs: GlyphSequence,
    /// Glyphs should animate to revealed (text flag AND visible)
    pub text_target: bool,
    /// Caption should animate to revealed
    pub caption_target: bool,
    /// Whether the quote container is on-screen
    pub visible: bool,
    /// Current palette cursor color
    pub color: Rgb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_by_stage() {
        assert!(!RevealStage::Idle.text_flag());
        assert!(!RevealStage::AwaitingQuote.text_flag());
        assert!(RevealStage::TextRevealing.text_flag());
        assert!(RevealStage::TextRevealed.text_flag());
        assert!(!RevealStage::TextRevealed.caption_flag());
        assert!(RevealStage::CaptionRevealed.caption_flag());
    }

    #[test]
    fn test_display() {
        assert_eq!(RevealStage::AwaitingQuote.to_string(), "awaiting quote");
        assert_eq!(RevealStage::default(), RevealStage::Idle);
    }
}
