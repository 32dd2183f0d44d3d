//! QuoteCard Widget
//!
//! The bordered card holding the quote glyphs, the author caption and the
//! retry button. Opacities come from the caller; the card only blends.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::border;
use ratatui::widgets::{Block, Borders, Widget};
use reveal_core::{GlyphSequence, Rgb};
use unicode_width::UnicodeWidthStr;

use crate::layout::{line_width, GlyphLines, CARD_CHROME_ROWS};
use crate::theme::{self, BACKDROP, CAPTION_TEXT, QUOTE_TEXT};

/// Retry button label
pub const RETRY_LABEL: &str = "⟳  new quote";

/// Caption rows counted from the card bottom
const CAPTION_FROM_BOTTOM: u16 = 4;
const BUTTON_FROM_BOTTOM: u16 = 2;

/// Card row of the caption
pub fn caption_row(card_height: u16) -> u16 {
    card_height.saturating_sub(CAPTION_FROM_BOTTOM)
}

/// Card row of the retry button
pub fn button_row(card_height: u16) -> u16 {
    card_height.saturating_sub(BUTTON_FROM_BOTTOM)
}

/// Columns of the retry button (card coordinates), brackets included
pub fn button_span(card_width: u16) -> (u16, u16) {
    let width = button_text().width();
    let width = u16::try_from(width).unwrap_or(u16::MAX).min(card_width);
    let start = card_width.saturating_sub(width) / 2;
    (start, start + width)
}

fn button_text() -> String {
    format!("( {RETRY_LABEL} )")
}

/// The quote card
pub struct QuoteCard<'a> {
    glyphs: &'a GlyphSequence,
    lines: &'a GlyphLines,
    author: &'a str,
    glyph_opacity: &'a [f32],
    caption_opacity: f32,
    accent: Rgb,
}

impl<'a> QuoteCard<'a> {
    pub fn new(glyphs: &'a GlyphSequence, lines: &'a GlyphLines, glyph_opacity: &'a [f32]) -> Self {
        Self {
            glyphs,
            lines,
            author: "",
            glyph_opacity,
            caption_opacity: 0.0,
            accent: BACKDROP,
        }
    }

    pub fn author(mut self, author: &'a str) -> Self {
        self.author = author;
        self
    }

    pub fn caption_opacity(mut self, opacity: f32) -> Self {
        self.caption_opacity = opacity;
        self
    }

    /// Palette cursor color for the border and button
    pub fn accent(mut self, accent: Rgb) -> Self {
        self.accent = accent;
        self
    }

    fn render_quote(&self, inner: Rect, buf: &mut Buffer) {
        let italic = Style::default().add_modifier(Modifier::ITALIC);

        for (row, line) in self.lines.iter().enumerate() {
            let Ok(row) = u16::try_from(row) else { break };
            let y = inner.y + row;
            if y >= inner.bottom() {
                break;
            }

            let width = line_width(self.glyphs, line);
            let mut x = inner.x + inner.width.saturating_sub(width) / 2;
            for &index in line {
                let Some(unit) = self.glyphs.units().get(index) else {
                    continue;
                };
                let opacity = self.glyph_opacity.get(index).copied().unwrap_or(0.0);
                let style = italic.fg(theme::blend(QUOTE_TEXT, BACKDROP, opacity));
                buf.set_stringn(x, y, unit, inner.right().saturating_sub(x).into(), style);
                x = x.saturating_add(u16::try_from(unit.width()).unwrap_or(1));
            }
        }
    }

    fn render_caption(&self, area: Rect, buf: &mut Buffer) {
        let y = area.y + caption_row(area.height);
        let caption = format!("▬ {}", self.author);
        let width = u16::try_from(caption.width()).unwrap_or(u16::MAX);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let style = Style::default().fg(theme::blend(CAPTION_TEXT, BACKDROP, self.caption_opacity));
        buf.set_stringn(x, y, &caption, area.width.saturating_sub(2).into(), style);

        let (start, _) = button_span(area.width);
        let style = Style::default()
            .fg(theme::blend(self.accent, BACKDROP, self.caption_opacity))
            .add_modifier(Modifier::BOLD);
        buf.set_stringn(
            area.x + start,
            area.y + button_row(area.height),
            button_text(),
            area.width.into(),
            style,
        );
    }
}

impl Widget for QuoteCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < CARD_CHROME_ROWS {
            return;
        }

        Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(theme::color(self.accent)))
            .style(Style::default().bg(theme::color(BACKDROP)))
            .render(area, buf);

        let inner = Rect::new(
            area.x + 2,
            area.y + 2,
            area.width.saturating_sub(4),
            area.height.saturating_sub(CARD_CHROME_ROWS),
        );
        self.render_quote(inner, buf);
        self.render_caption(area, buf);
    }
}
