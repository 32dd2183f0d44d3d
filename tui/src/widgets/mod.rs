//! Widgets
//!
//! - **QuoteCard**: bordered card with the fading quote, caption and retry button
//! - **Starfield**: sky gradient and twinkling stars behind the page

pub mod quote_card;
pub mod starfield;

pub use quote_card::QuoteCard;
pub use starfield::{Sky, Starfield};
