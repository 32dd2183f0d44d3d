//! Visibility Tracking
//!
//! A narrow capability for "is this element on screen?". Subscribers get a
//! boolean each time the element's visible fraction crosses the threshold,
//! in either direction. The first report after subscribing always emits.
//!
//! [`ViewportTracker`] is the in-process implementation: the rendering
//! surface reports visible fractions, the tracker turns them into threshold
//! crossings.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Identifies an observed element
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    /// Create an element ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback receiving visibility transitions
pub type VisibilityCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Capability interface for viewport observation
pub trait VisibilityTracker: Send + Sync {
    /// Observe `element`; `on_change` receives every threshold crossing
    ///
    /// Observation lasts until the returned [`Subscription`] is released.
    fn subscribe(&self, element: ElementId, on_change: VisibilityCallback) -> Subscription;
}

/// Live observation; released on [`Subscription::unsubscribe`] or drop
#[must_use = "dropping a Subscription stops the observation"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a release action
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Stop observing
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// One registered observation
struct Observation {
    element: ElementId,
    callback: Arc<dyn Fn(bool) + Send + Sync>,
    last: Option<bool>,
}

#[derive(Default)]
struct TrackerState {
    observations: HashMap<u64, Observation>,
    fractions: HashMap<ElementId, f32>,
}

/// In-process tracker fed by the rendering surface
///
/// Cloning shares the same registry.
#[derive(Clone)]
pub struct ViewportTracker {
    threshold: f32,
    next_id: Arc<AtomicU64>,
    state: Arc<Mutex<TrackerState>>,
}

impl ViewportTracker {
    /// Create a tracker with the given visible-fraction threshold
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            next_id: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(TrackerState::default())),
        }
    }

    /// The visible-fraction threshold
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether `fraction` counts as on-screen
    #[must_use]
    pub fn is_intersecting(&self, fraction: f32) -> bool {
        fraction > 0.0 && fraction >= self.threshold
    }

    /// Report the visible fraction (0.0..=1.0) of `element`
    ///
    /// Observers whose last reported state differs are notified. Callbacks
    /// run after the registry lock is released.
    pub fn report(&self, element: &ElementId, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        let visible = self.is_intersecting(fraction);

        let notify: Vec<_> = {
            let mut state = self.state.lock();
            state.fractions.insert(element.clone(), fraction);
            state
                .observations
                .values_mut()
                .filter(|obs| obs.element == *element && obs.last != Some(visible))
                .map(|obs| {
                    obs.last = Some(visible);
                    Arc::clone(&obs.callback)
                })
                .collect()
        };

        if !notify.is_empty() {
            tracing::trace!(element = %element, fraction, visible, "Visibility crossed threshold");
        }
        for callback in notify {
            callback(visible);
        }
    }

    /// Number of live observations
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.state.lock().observations.len()
    }
}

impl VisibilityTracker for ViewportTracker {
    fn subscribe(&self, element: ElementId, on_change: VisibilityCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Arc<dyn Fn(bool) + Send + Sync> = Arc::from(on_change);

        let initial = {
            let mut state = self.state.lock();
            let initial = state
                .fractions
                .get(&element)
                .map(|fraction| self.is_intersecting(*fraction));
            state.observations.insert(
                id,
                Observation {
                    element: element.clone(),
                    callback: Arc::clone(&callback),
                    last: initial,
                },
            );
            initial
        };

        tracing::debug!(element = %element, id, "Visibility observation armed");
        if let Some(visible) = initial {
            callback(visible);
        }

        let state = Arc::clone(&self.state);
        Subscription::new(move || {
            if state.lock().observations.remove(&id).is_some() {
                tracing::debug!(id, "Visibility observation released");
            }
        })
    }
}

impl std::fmt::Debug for ViewportTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportTracker")
            .field("threshold", &self.threshold)
            .field("observations", &self.observation_count())
            .finish()
    }
}
