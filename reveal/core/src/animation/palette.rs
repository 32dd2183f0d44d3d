//! Palette Color Cycler
//!
//! Interpolates through a fixed palette in order, then back again (mirrored
//! repeat), forever. The cycler is a pure function of elapsed time; `spawn`
//! wraps it in a task that publishes the current color until stopped.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::timing::EasingFunction;

/// Default palette: mint, ocean blue, orchid, rose
pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb::new(0x13, 0xFF, 0xAA),
    Rgb::new(0x1E, 0x67, 0xC6),
    Rgb::new(0xCE, 0x84, 0xCF),
    Rgb::new(0xDD, 0x33, 0x5C),
];

/// Curve between neighbouring palette colors
const SEGMENT_EASING: EasingFunction = EasingFunction::EaseInOut;

/// An sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a color from channels
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation towards `other` (t clamped to 0.0..=1.0)
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        // stays within 0..=255 because t is clamped
        let mix = |a: u8, b: u8| -> u8 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parse `#RRGGBB` (the leading `#` is optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{s}', expected #RRGGBB"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color '{s}': {e}"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Mirrored palette interpolation over a fixed period
#[derive(Clone, Debug)]
pub struct ColorCycler {
    palette: Vec<Rgb>,
    period: Duration,
}

impl ColorCycler {
    /// Create a cycler over `palette` taking `period` for one pass
    ///
    /// An empty palette falls back to [`DEFAULT_PALETTE`].
    #[must_use]
    pub fn new(palette: Vec<Rgb>, period: Duration) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            period,
        }
    }

    /// The palette being cycled
    #[must_use]
    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Duration of one pass through the palette
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Color at `elapsed` since the cycle started
    ///
    /// Even passes run first to last color, odd passes run back.
    #[must_use]
    pub fn color_at(&self, elapsed: Duration) -> Rgb {
        let segments = self.palette.len() - 1;
        if segments == 0 || self.period.is_zero() {
            return self.palette[0];
        }

        let position = elapsed.as_secs_f64() / self.period.as_secs_f64();
        let pass = position.floor();
        let mut progress = position - pass;
        if pass % 2.0 >= 1.0 {
            progress = 1.0 - progress;
        }

        #[allow(clippy::cast_precision_loss)]
        let scaled = progress * segments as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (scaled.floor() as usize).min(segments - 1);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let local = (scaled - index as f64) as f32;

        self.palette[index].lerp(self.palette[index + 1], SEGMENT_EASING.apply(local))
    }

    /// Run the cycler as a task publishing a color every `frame_interval`
    ///
    /// The task ends when the returned handle is stopped or dropped, or when
    /// every receiver is gone.
    #[must_use]
    pub fn spawn(self, frame_interval: Duration) -> (CyclerHandle, watch::Receiver<Rgb>) {
        let (tx, rx) = watch::channel(self.color_at(Duration::ZERO));
        let frame_interval = frame_interval.max(Duration::from_millis(1));
        let started = Instant::now();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(frame_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if tx.send(self.color_at(started.elapsed())).is_err() {
                    tracing::debug!("Palette receivers dropped, stopping color cycler");
                    break;
                }
            }
        });

        (CyclerHandle { task: Some(task) }, rx)
    }
}

impl Default for ColorCycler {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec(), Duration::from_secs(10))
    }
}

/// Owned handle to a running color cycler; stops the task when dropped
#[derive(Debug)]
pub struct CyclerHandle {
    task: Option<JoinHandle<()>>,
}

impl CyclerHandle {
    /// Stop the cycler
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the cycler task is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for CyclerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
