//! Quote TUI - Terminal surface for the staged quote reveal
//!
//! Renders the quote card driven by `reveal_core::RevealSequencer`.
//!
//! # Architecture
//!
//! - **App**: Event loop bridging terminal input, frame ticks and sequencer events
//! - **Cli**: Arguments and configuration resolution
//! - **Fade**: Per-glyph staggered opacity, approximated by color blending
//! - **Layout**: Page geometry and the quote card's visible fraction
//! - **Widgets**: Quote card and starfield backdrop
//! - **Theme**: Fixed colors and blending helpers

pub mod app;
pub mod cli;
pub mod fade;
pub mod layout;
pub mod theme;
pub mod widgets;

pub use app::App;
