//! Reveal Core - Headless Quote Reveal Sequencing
//!
//! This crate provides the timing and state logic behind the quote display,
//! completely independent of any UI framework. It can drive a TUI, a web
//! surface, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Presentation Surface                      │
//! │        (reads RevealSnapshot, sends retrigger on click)       │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                       RevealSequencer                         │
//! │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │ QuoteSource │  │  Visibility  │  │     ColorCycler      │  │
//! │  │  (fetch)    │  │   Tracker    │  │  (palette cursor)    │  │
//! │  └─────────────┘  └──────────────┘  └──────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`RevealSequencer`]: The state machine coordinating fetch, visibility and timers
//! - [`RevealStage`]: Current phase of the staged reveal
//! - [`RevealSnapshot`]: Everything the presentation layer needs at an instant
//! - [`QuoteSource`]: Where quotes come from (HTTP, fixed list, test doubles)
//! - [`VisibilityTracker`]: Capability interface for viewport observation
//! - [`ColorCycler`]: Mirrored palette interpolation
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use reveal_core::{HttpQuoteSource, RevealConfig, RevealSequencer, ViewportTracker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RevealConfig::default();
//!     let source = HttpQuoteSource::from_config(&config.source).expect("http client");
//!     let tracker = ViewportTracker::new(config.visibility_threshold);
//!     let mut sequencer = RevealSequencer::new(source, Arc::new(tracker.clone()), config);
//!
//!     sequencer.start();
//!     tracker.report(sequencer.element(), 1.0);
//!
//!     while sequencer.process_next_event().await {
//!         let snapshot = sequencer.snapshot();
//!         // render snapshot
//!     }
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has no dependency on ratatui, crossterm, or any other UI
//! framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod config;
pub mod glyph;
pub mod quote;
pub mod sequencer;
pub mod source;
pub mod visibility;

pub use animation::{ColorCycler, CyclerHandle, EasingFunction, Rgb, DEFAULT_PALETTE};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, RevealConfig, RevealToml, SourceConfig,
};
pub use glyph::{split_glyphs, GlyphSequence};
pub use quote::Quote;
pub use sequencer::{RevealSequencer, RevealSnapshot, RevealStage, QUOTE_ELEMENT};
pub use source::{choose_candidate, FetchError, FixedQuoteSource, HttpQuoteSource, QuoteSource};
pub use visibility::{ElementId, Subscription, ViewportTracker, VisibilityCallback, VisibilityTracker};
