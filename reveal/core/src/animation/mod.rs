//! Animation Primitives
//!
//! Surface-agnostic pieces the reveal relies on: easing curves and the
//! palette color cycler. Surfaces translate these into their own rendering.

mod palette;
mod timing;

pub use palette::{ColorCycler, CyclerHandle, Rgb, DEFAULT_PALETTE};
pub use timing::EasingFunction;
