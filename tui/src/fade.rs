//! Staggered Fades
//!
//! A terminal cell has no alpha channel, so opacity is computed here and
//! applied as a color blend by the widgets.
//!
//! Element `i` of a fade starts moving `i * stagger` after the target
//! changed and takes `duration` to arrive. Changing the target mid-flight
//! starts from wherever each element currently is, so hiding a half-revealed
//! quote never jumps.

use std::time::{Duration, Instant};

use reveal_core::{EasingFunction, GlyphSequence};

/// Opacity animation over a row of elements
#[derive(Clone, Debug)]
pub struct StaggeredFade {
    /// Opacity of each element when the target last changed
    from: Vec<f32>,
    /// Revealed or hidden
    target: bool,
    /// When the target last changed
    changed_at: Instant,
    stagger: Duration,
    duration: Duration,
    easing: EasingFunction,
}

impl StaggeredFade {
    /// Create a fully hidden fade over `len` elements
    pub fn new(len: usize, stagger: Duration, duration: Duration, now: Instant) -> Self {
        Self {
            from: vec![0.0; len],
            target: false,
            changed_at: now,
            stagger,
            duration,
            easing: EasingFunction::EaseOut,
        }
    }

    /// Set the easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Start over with `len` hidden elements
    pub fn reset(&mut self, len: usize, now: Instant) {
        self.from.clear();
        self.from.resize(len, 0.0);
        self.target = false;
        self.changed_at = now;
    }

    /// Animate towards revealed (`true`) or hidden (`false`)
    ///
    /// Setting the current target again does nothing.
    pub fn set_target(&mut self, target: bool, now: Instant) {
        if target == self.target {
            return;
        }
        let current: Vec<f32> = (0..self.from.len()).map(|i| self.opacity(i, now)).collect();
        self.from = current;
        self.target = target;
        self.changed_at = now;
    }

    /// Current target
    pub fn target(&self) -> bool {
        self.target
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.from.len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    /// Opacity of element `index` at `now` (0.0..=1.0)
    pub fn opacity(&self, index: usize, now: Instant) -> f32 {
        let Some(&from) = self.from.get(index) else {
            return 0.0;
        };
        let to = if self.target { 1.0 } else { 0.0 };

        let since = now.saturating_duration_since(self.changed_at);
        let offset = GlyphSequence::stagger_offset(index, self.stagger);
        let Some(running) = since.checked_sub(offset) else {
            return from;
        };
        if self.duration.is_zero() {
            return to;
        }

        let progress = (running.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        from + (to - from) * self.easing.apply(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGGER: Duration = Duration::from_millis(50);
    const FADE: Duration = Duration::from_millis(500);

    fn fade(len: usize, now: Instant) -> StaggeredFade {
        StaggeredFade::new(len, STAGGER, FADE, now).with_easing(EasingFunction::Linear)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_starts_hidden() {
        let now = Instant::now();
        let fade = fade(3, now);
        assert!(!fade.target());
        assert!((0..3).all(|i| fade.opacity(i, now) == 0.0));
        assert!((0..3).all(|i| fade.opacity(i, now + FADE * 4) == 0.0));
    }

    #[test]
    fn test_stagger_offsets_each_element() {
        let t0 = Instant::now();
        let mut fade = fade(3, t0);
        fade.set_target(true, t0);

        let at = t0 + Duration::from_millis(300);
        assert!(close(fade.opacity(0, at), 0.6));
        assert!(close(fade.opacity(1, at), 0.5));
        assert!(close(fade.opacity(2, at), 0.4));
    }

    #[test]
    fn test_last_element_arrives_last() {
        let t0 = Instant::now();
        let mut fade = fade(10, t0);
        fade.set_target(true, t0);

        // 9 * 50ms + 500ms
        let almost = t0 + Duration::from_millis(940);
        assert!(close(fade.opacity(8, almost), 1.0));
        assert!(fade.opacity(9, almost) < 1.0);
        let done = t0 + Duration::from_millis(950);
        assert!((0..10).all(|i| close(fade.opacity(i, done), 1.0)));
    }

    #[test]
    fn test_reversal_starts_from_current_opacity() {
        let t0 = Instant::now();
        let mut fade = fade(1, t0);
        fade.set_target(true, t0);

        let mid = t0 + Duration::from_millis(250);
        fade.set_target(false, mid);
        assert!(close(fade.opacity(0, mid), 0.5));
        assert!(close(fade.opacity(0, mid + Duration::from_millis(250)), 0.25));
        assert!(close(fade.opacity(0, mid + FADE), 0.0));
    }

    #[test]
    fn test_same_target_keeps_timeline() {
        let t0 = Instant::now();
        let mut fade = fade(1, t0);
        fade.set_target(true, t0);
        fade.set_target(true, t0 + Duration::from_millis(400));
        assert!(close(fade.opacity(0, t0 + FADE), 1.0));
    }

    #[test]
    fn test_reset_hides_everything() {
        let t0 = Instant::now();
        let mut fade = fade(2, t0);
        fade.set_target(true, t0);

        let later = t0 + Duration::from_secs(2);
        fade.reset(5, later);
        assert_eq!(fade.len(), 5);
        assert!(!fade.target());
        assert!((0..5).all(|i| fade.opacity(i, later) == 0.0));
    }

    #[test]
    fn test_easing_shapes_progress() {
        let t0 = Instant::now();
        let mut eased = StaggeredFade::new(1, STAGGER, FADE, t0);
        let mut linear = fade(1, t0);
        eased.set_target(true, t0);
        linear.set_target(true, t0);

        let half = t0 + FADE / 2;
        assert!(close(linear.opacity(0, half), 0.5));
        assert!(eased.opacity(0, half) > 0.5);
        assert!(close(eased.opacity(0, t0 + FADE), 1.0));
    }

    #[test]
    fn test_out_of_range_is_hidden() {
        let t0 = Instant::now();
        let mut fade = fade(1, t0);
        fade.set_target(true, t0);
        assert_eq!(fade.opacity(7, t0 + FADE), 0.0);
    }
}
