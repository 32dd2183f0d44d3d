//! Page Layout
//!
//! The screen is a window onto a page twice the viewport height. The quote
//! card is centered in the first screenful; scrolling down moves it out of
//! view, which is what the visibility tracker observes.
//!
//! ```text
//! page row 0  ┌──────────────────────────┐ ◀─ scroll = 0
//!             │        ┌──────────┐      │
//!             │        │  card    │      │  viewport
//!             │        └──────────┘      │
//!             ├──────────────────────────┤ ◀─ scroll = max
//!             │     (below the fold)     │
//!             └──────────────────────────┘
//! ```

use std::ops::Range;

use ratatui::layout::Rect;
use reveal_core::GlyphSequence;
use unicode_width::UnicodeWidthStr;

/// Widest the card gets, borders included
pub const MAX_CARD_WIDTH: u16 = 72;

/// Narrowest usable card
pub const MIN_CARD_WIDTH: u16 = 12;

/// Rows the card needs besides the quote lines
///
/// Border, padding, blank, caption, blank, button, border.
pub const CARD_CHROME_ROWS: u16 = 7;

/// Horizontal space taken by border and padding
pub const CARD_CHROME_COLS: u16 = 4;

/// Glyph indices of each wrapped line, in order
pub type GlyphLines = Vec<Vec<usize>>;

/// Wrap the glyph sequence to `width` columns
///
/// Returns indices into the sequence so every rendered cell keeps its
/// stagger position. Whitespace swallowed at line breaks has no cell.
pub fn wrap_glyphs(glyphs: &GlyphSequence, width: usize) -> GlyphLines {
    let units = glyphs.units();
    let text = glyphs.text();
    let mut cursor = 0;
    let mut lines = Vec::new();

    for line in textwrap::wrap(&text, width.max(1)) {
        let mut indices = Vec::new();
        let mut buf = [0u8; 4];
        for ch in line.chars() {
            let ch = ch.encode_utf8(&mut buf);
            if let Some(offset) = units[cursor..].iter().position(|unit| unit == ch) {
                indices.push(cursor + offset);
                cursor += offset + 1;
            }
        }
        lines.push(indices);
    }

    if lines.is_empty() {
        lines.push(Vec::new());
    }
    lines
}

/// Display width of one wrapped line
pub fn line_width(glyphs: &GlyphSequence, line: &[usize]) -> u16 {
    let width: usize = line
        .iter()
        .filter_map(|&i| glyphs.units().get(i))
        .map(|unit| unit.width())
        .sum();
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Geometry of one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLayout {
    /// Screen area the page scrolls in (status line excluded)
    pub viewport: Rect,
    /// Card size
    pub card_width: u16,
    /// Card size
    pub card_height: u16,
    /// Card column on screen
    pub card_x: u16,
    /// Card row in page coordinates
    pub card_top: u16,
    /// Total page rows
    pub page_height: u16,
}

impl PageLayout {
    /// Width available for quote text inside a card in `viewport`
    pub fn text_width(viewport: Rect) -> u16 {
        Self::card_width_for(viewport).saturating_sub(CARD_CHROME_COLS)
    }

    fn card_width_for(viewport: Rect) -> u16 {
        viewport
            .width
            .saturating_sub(4)
            .clamp(MIN_CARD_WIDTH, MAX_CARD_WIDTH)
            .min(viewport.width)
    }

    /// Lay out a card holding `quote_lines` wrapped lines
    pub fn compute(viewport: Rect, quote_lines: usize) -> Self {
        let card_width = Self::card_width_for(viewport);
        let lines = u16::try_from(quote_lines.max(1)).unwrap_or(u16::MAX);
        let card_height = lines.saturating_add(CARD_CHROME_ROWS);
        let page_height = viewport
            .height
            .saturating_mul(2)
            .max(card_height.saturating_add(viewport.height));

        Self {
            viewport,
            card_width,
            card_height,
            card_x: viewport.x + (viewport.width.saturating_sub(card_width)) / 2,
            card_top: viewport.height.saturating_sub(card_height) / 2,
            page_height,
        }
    }

    /// Furthest the page can scroll
    pub fn max_scroll(&self) -> u16 {
        self.page_height.saturating_sub(self.viewport.height)
    }

    /// Card rows (card coordinates) inside the viewport at `scroll`
    pub fn visible_rows(&self, scroll: u16) -> Range<u16> {
        let top = self.card_top;
        let bottom = self.card_top.saturating_add(self.card_height);
        let window_bottom = scroll.saturating_add(self.viewport.height);

        let start = top.max(scroll);
        let end = bottom.min(window_bottom);
        if start >= end {
            return 0..0;
        }
        (start - top)..(end - top)
    }

    /// Fraction of the card inside the viewport at `scroll`
    pub fn visible_fraction(&self, scroll: u16) -> f32 {
        if self.card_height == 0 || self.viewport.width == 0 {
            return 0.0;
        }
        let rows = self.visible_rows(scroll);
        f32::from(rows.end - rows.start) / f32::from(self.card_height)
    }

    /// Screen row of card row `row` at `scroll`, if on screen
    pub fn screen_row(&self, row: u16, scroll: u16) -> Option<u16> {
        let page_row = self.card_top.checked_add(row)?;
        let offset = page_row.checked_sub(scroll)?;
        (offset < self.viewport.height).then(|| self.viewport.y + offset)
    }
}
