//! Starfield Backdrop
//!
//! Paints the sky gradient and a scatter of twinkling stars behind the page.
//! Star positions are fractions of the area so they survive resizes.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::Rng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use reveal_core::Rgb;

use crate::theme::{self, STAR};

/// Star glyphs, faintest first
const STAR_GLYPHS: [&str; 4] = ["·", ".", "+", "*"];

/// Stars per 1000 cells
const DENSITY: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Star {
    x: f32,
    y: f32,
    /// Index into `STAR_GLYPHS`
    size: usize,
    /// Twinkle phase offset (radians)
    phase: f32,
    /// Twinkles per second
    rate: f32,
}

/// A fixed scatter of stars
#[derive(Clone, Debug, Default)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    /// Scatter `count` stars
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                x: rng.gen_range(0.0..1.0),
                y: rng.gen_range(0.0..1.0),
                size: rng.gen_range(0..STAR_GLYPHS.len()),
                phase: rng.gen_range(0.0..TAU),
                rate: rng.gen_range(0.1..0.6),
            })
            .collect();
        Self { stars }
    }

    /// Scatter enough stars for an area of `width` x `height` cells
    pub fn for_area<R: Rng + ?Sized>(width: u16, height: u16, rng: &mut R) -> Self {
        let cells = usize::from(width) * usize::from(height);
        Self::generate(cells * DENSITY / 1000, rng)
    }

    /// Number of stars
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Whether there are no stars
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Widget painting this starfield at `elapsed` with the sky tinted `glow`
    pub fn sky(&self, elapsed: Duration, glow: Rgb) -> Sky<'_> {
        Sky {
            field: self,
            elapsed,
            glow,
        }
    }
}

/// Sky gradient plus stars
pub struct Sky<'a> {
    field: &'a Starfield,
    elapsed: Duration,
    glow: Rgb,
}

impl Widget for Sky<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 0..area.height {
            for x in 0..area.width {
                let bg = theme::sky(x, y, area.width, area.height, self.glow);
                buf[(area.x + x, area.y + y)]
                    .set_symbol(" ")
                    .set_bg(theme::color(bg));
            }
        }

        let t = self.elapsed.as_secs_f32();
        for star in &self.field.stars {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (x, y) = (
                (star.x * f32::from(area.width)) as u16,
                (star.y * f32::from(area.height)) as u16,
            );
            if x >= area.width || y >= area.height {
                continue;
            }

            let twinkle = 0.5 + 0.5 * (star.phase + t * star.rate * TAU).sin();
            let bg = theme::sky(x, y, area.width, area.height, self.glow);
            let cell = &mut buf[(area.x + x, area.y + y)];
            cell.set_symbol(STAR_GLYPHS[star.size]);
            cell.set_style(Style::default().fg(theme::blend(STAR, bg, 0.25 + 0.6 * twinkle)));
        }
    }
}
