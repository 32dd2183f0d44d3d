//! Theme and Colors
//!
//! The quote card sits on a near-black night sky. The only moving color is
//! the palette cursor from the core cycler, which tints the card border, the
//! retry button and the glow at the bottom of the sky.

use ratatui::style::Color;
use reveal_core::Rgb;

// ============================================================================
// Sky
// ============================================================================

/// Night sky backdrop
pub const BACKDROP: Rgb = Rgb::new(0x02, 0x06, 0x17);

/// How far the palette glow reaches into the backdrop at full strength
pub const GLOW_STRENGTH: f32 = 0.55;

/// Brightest star
pub const STAR: Rgb = Rgb::new(0xF8, 0xFA, 0xFC);

// ============================================================================
// Card
// ============================================================================

/// Quote text at full opacity
pub const QUOTE_TEXT: Rgb = Rgb::new(0xE5, 0xE7, 0xEB);

/// Author caption at full opacity
pub const CAPTION_TEXT: Rgb = Rgb::new(0x9C, 0xA3, 0xAF);

/// Status line
pub const STATUS_TEXT: Rgb = Rgb::new(0x64, 0x74, 0x8B);

/// Status line when the last fetch failed
pub const STATUS_ERROR: Rgb = Rgb::new(0xF8, 0x71, 0x71);

/// Convert a core color to a terminal color
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// `fg` drawn at `opacity` over `bg`
pub fn blend(fg: Rgb, bg: Rgb, opacity: f32) -> Color {
    color(bg.lerp(fg, opacity))
}

/// Backdrop color of cell (`x`, `y`) in a `width` x `height` sky
///
/// Elliptical gradient centered at the top edge: plain backdrop for the
/// inner half, shading to `glow` at the corners.
pub fn sky(x: u16, y: u16, width: u16, height: u16, glow: Rgb) -> Rgb {
    if width == 0 || height == 0 {
        return BACKDROP;
    }
    let half = f32::from(width) / 2.0;
    let dx = (f32::from(x) + 0.5 - half) / half;
    let dy = (f32::from(y) + 0.5) / f32::from(height);
    let distance = (dx * dx + dy * dy).sqrt();
    let t = ((distance - 0.5) / 0.5).clamp(0.0, 1.0);
    BACKDROP.lerp(glow, t * GLOW_STRENGTH)
}
