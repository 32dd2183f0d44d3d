//! Reveal Sequencer - The Staged Reveal State Machine
//!
//! Coordinates quote arrival, viewport visibility and the two delayed reveal
//! stages:
//!
//! ```text
//! Idle ──start/retrigger──▶ AwaitingQuote ──fetch ok + settle delay──▶ TextRevealing
//!                              ▲    │ fetch failed: stay, log                │
//!                              │    ▼                          visible + hold delay
//!                           retrigger (from any stage)                       ▼
//!                                            CaptionRevealed ◀──caption delay── TextRevealed
//! ```
//!
//! # Event Model
//!
//! The fetch, every delay and every visibility callback only post a
//! [`SequencerEvent`] to the sequencer's own queue; all state changes happen
//! in [`RevealSequencer::process_next_event`] on the owner. Events carry the
//! cycle they were issued for, and anything from an older cycle is dropped.
//!
//! # Visibility Gating
//!
//! The text target is `text_flag && visible`, recomputed on every visibility
//! change. The hold delay before the caption is armed the first time the
//! text target becomes true in a cycle, so the caption never appears before
//! the glyphs have been on screen for the full hold.

mod stage;
mod timers;

pub use stage::{RevealSnapshot, RevealStage};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::animation::{ColorCycler, CyclerHandle, Rgb, DEFAULT_PALETTE};
use crate::config::RevealConfig;
use crate::glyph::GlyphSequence;
use crate::quote::Quote;
use crate::source::{choose_candidate, FetchError, QuoteSource};
use crate::visibility::{ElementId, Subscription, VisibilityTracker};

use timers::{schedule, TaskSlot};

/// Element the sequencer observes by default
pub const QUOTE_ELEMENT: &str = "quote";

/// Delayed transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RevealTimer {
    /// Quote arrived, text reveal pending
    Settle,
    /// Text on screen, text-revealed pending
    Hold,
    /// Caption pending
    Caption,
}

/// Everything that can change sequencer state
#[derive(Debug)]
pub(crate) enum SequencerEvent {
    /// A fetch issued for `cycle` finished
    QuoteFetched {
        cycle: u64,
        result: Result<Quote, FetchError>,
    },
    /// A delay scheduled for `cycle` elapsed
    TimerElapsed { cycle: u64, timer: RevealTimer },
    /// The observed element crossed the visibility threshold
    VisibilityChanged(bool),
}

/// The staged reveal state machine
///
/// One instance per mounted display. It owns every task it spawns, the
/// visibility subscription and the color cycler; dropping it releases all of
/// them.
pub struct RevealSequencer<S: QuoteSource> {
    /// Configuration
    config: RevealConfig,
    /// Where quotes come from
    source: Arc<S>,
    /// Viewport observation capability
    tracker: Arc<dyn VisibilityTracker>,
    /// Element observed for visibility
    element: ElementId,

    // === Reveal State ===
    stage: RevealStage,
    quote: Quote,
    glyphs: GlyphSequence,
    visible: bool,
    /// Hold delay armed for the current cycle
    hold_armed: bool,
    /// Current fetch-and-reveal cycle
    cycle: u64,
    /// Between `start()` and `dispose()`
    mounted: bool,
    /// Failed fetches since construction
    failed_fetches: u64,

    // === Owned Resources ===
    fetch_task: TaskSlot,
    timer_task: TaskSlot,
    subscription: Option<Subscription>,
    cycler: Option<CyclerHandle>,
    palette_rx: Option<watch::Receiver<Rgb>>,

    // === Event Queue ===
    events_tx: mpsc::UnboundedSender<SequencerEvent>,
    events_rx: mpsc::UnboundedReceiver<SequencerEvent>,
}

impl<S: QuoteSource + 'static> RevealSequencer<S> {
    /// Create a sequencer; nothing happens until [`start`](Self::start)
    pub fn new(source: S, tracker: Arc<dyn VisibilityTracker>, config: RevealConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let quote = Quote::default();
        let glyphs = GlyphSequence::from_text(&quote.display_text());

        Self {
            config,
            source: Arc::new(source),
            tracker,
            element: ElementId::new(QUOTE_ELEMENT),
            stage: RevealStage::Idle,
            quote,
            glyphs,
            visible: false,
            hold_armed: false,
            cycle: 0,
            mounted: false,
            failed_fetches: 0,
            fetch_task: TaskSlot::default(),
            timer_task: TaskSlot::default(),
            subscription: None,
            cycler: None,
            palette_rx: None,
            events_tx,
            events_rx,
        }
    }

    // =========================================================================
    // Public Contract
    // =========================================================================

    /// Mount: start the color cycler, arm visibility observation and request
    /// a quote
    ///
    /// Calling it again while mounted does nothing.
    pub fn start(&mut self) {
        if self.mounted {
            tracing::debug!(cycle = self.cycle, "Sequencer already started");
            return;
        }
        self.mounted = true;

        let cycler = ColorCycler::new(self.config.palette.clone(), self.config.palette_period);
        let (handle, palette_rx) = cycler.spawn(self.config.palette_frame);
        self.cycler = Some(handle);
        self.palette_rx = Some(palette_rx);

        if self.subscription.is_none() {
            let tx = self.events_tx.clone();
            self.subscription = Some(self.tracker.subscribe(
                self.element.clone(),
                Box::new(move |visible| {
                    let _ = tx.send(SequencerEvent::VisibilityChanged(visible));
                }),
            ));
        }

        tracing::info!(source = self.source.name(), element = %self.element, "Reveal sequencer started");
        self.begin_cycle();
    }

    /// Throw away the current cycle and fetch a new quote
    ///
    /// Legal in every stage. Pending delays and the in-flight fetch of the
    /// previous cycle are cancelled.
    pub fn retrigger(&mut self) {
        tracing::info!(from_stage = %self.stage, cycle = self.cycle, "Retrigger requested");
        self.begin_cycle();
    }

    /// Unmount: release the visibility subscription, stop the color cycler
    /// and cancel pending work
    ///
    /// Safe to call when never started and safe to call twice.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(mut cycler) = self.cycler.take() {
            cycler.stop();
        }
        self.palette_rx = None;

        let cancelled_fetch = self.fetch_task.cancel();
        let cancelled_timer = self.timer_task.cancel();
        // Anything already queued belongs to the old mount
        while self.events_rx.try_recv().is_ok() {}

        if self.mounted {
            tracing::info!(
                cycle = self.cycle,
                cancelled_fetch,
                cancelled_timer,
                "Reveal sequencer disposed"
            );
        }

        self.cycle += 1;
        self.mounted = false;
        self.stage = RevealStage::Idle;
        self.visible = false;
        self.hold_armed = false;
        self.set_quote(Quote::default());
    }

    // =========================================================================
    // Event Processing
    // =========================================================================

    /// Wait for the next event and apply it
    ///
    /// Returns `false` only if the event queue is closed. Cancel-safe: if the
    /// future is dropped before an event arrives, nothing is lost.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply every event already queued without waiting; returns how many
    pub fn drain_ready(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Process events until no fetch or delay is outstanding
    ///
    /// Stops early in `TextRevealing` while the element is off-screen, since
    /// the next step then waits on visibility rather than on a timer.
    pub async fn run_until_settled(&mut self) {
        self.drain_ready();
        while self.has_pending_work() {
            if !self.process_next_event().await {
                break;
            }
        }
    }

    fn handle_event(&mut self, event: SequencerEvent) {
        match event {
            SequencerEvent::VisibilityChanged(visible) => self.on_visibility(visible),
            SequencerEvent::QuoteFetched { cycle, result } => {
                if cycle != self.cycle {
                    tracing::debug!(cycle, current = self.cycle, "Dropping stale quote");
                    return;
                }
                self.fetch_task.clear();
                self.on_quote(result);
            }
            SequencerEvent::TimerElapsed { cycle, timer } => {
                if cycle != self.cycle {
                    tracing::debug!(cycle, current = self.cycle, ?timer, "Dropping stale timer");
                    return;
                }
                self.timer_task.clear();
                self.on_timer(timer);
            }
        }
    }

    fn on_quote(&mut self, result: Result<Quote, FetchError>) {
        if self.stage != RevealStage::AwaitingQuote {
            tracing::debug!(stage = %self.stage, "Quote arrived outside AwaitingQuote, ignoring");
            return;
        }

        match result {
            Ok(quote) => {
                tracing::info!(cycle = self.cycle, author = %quote.author, "Quote arrived");
                self.set_quote(quote);
                self.arm_timer(RevealTimer::Settle, self.config.settle_delay);
            }
            Err(e) => {
                self.failed_fetches += 1;
                tracing::warn!(
                    error = %e,
                    cycle = self.cycle,
                    source = self.source.name(),
                    "Error fetching quote"
                );
            }
        }
    }

    fn on_timer(&mut self, timer: RevealTimer) {
        match (timer, self.stage) {
            (RevealTimer::Settle, RevealStage::AwaitingQuote) => {
                self.set_stage(RevealStage::TextRevealing);
                self.maybe_arm_hold();
            }
            (RevealTimer::Hold, RevealStage::TextRevealing) => {
                self.set_stage(RevealStage::TextRevealed);
                if self.config.caption_delay.is_zero() {
                    self.set_stage(RevealStage::CaptionRevealed);
                } else {
                    self.arm_timer(RevealTimer::Caption, self.config.caption_delay);
                }
            }
            (RevealTimer::Caption, RevealStage::TextRevealed) => {
                self.set_stage(RevealStage::CaptionRevealed);
            }
            (timer, stage) => {
                tracing::debug!(?timer, %stage, "Timer does not apply to current stage");
            }
        }
    }

    fn on_visibility(&mut self, visible: bool) {
        if !self.mounted {
            return;
        }
        tracing::debug!(visible, stage = %self.stage, "Visibility changed");
        self.visible = visible;
        self.maybe_arm_hold();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Reset to a cleared `AwaitingQuote` and issue a new request
    fn begin_cycle(&mut self) {
        self.cycle += 1;
        self.fetch_task.cancel();
        self.timer_task.cancel();

        self.set_quote(Quote::default());
        self.hold_armed = false;
        self.set_stage(RevealStage::AwaitingQuote);

        let cycle = self.cycle;
        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        self.fetch_task.replace(tokio::spawn(async move {
            let result = source
                .fetch_candidates()
                .await
                .and_then(|candidates| choose_candidate(candidates, &mut rand::thread_rng()));
            let _ = tx.send(SequencerEvent::QuoteFetched { cycle, result });
        }));

        tracing::debug!(cycle, "Quote requested");
    }

    fn arm_timer(&mut self, timer: RevealTimer, delay: std::time::Duration) {
        tracing::trace!(cycle = self.cycle, ?timer, ?delay, "Timer armed");
        self.timer_task.replace(schedule(
            delay,
            self.events_tx.clone(),
            SequencerEvent::TimerElapsed {
                cycle: self.cycle,
                timer,
            },
        ));
    }

    fn maybe_arm_hold(&mut self) {
        if self.stage == RevealStage::TextRevealing && self.visible && !self.hold_armed {
            self.hold_armed = true;
            self.arm_timer(RevealTimer::Hold, self.config.hold_delay);
        }
    }

    fn set_stage(&mut self, stage: RevealStage) {
        if self.stage != stage {
            tracing::debug!(from = %self.stage, to = %stage, cycle = self.cycle, "Stage transition");
            self.stage = stage;
        }
    }

    /// Replace the quote and rebuild its glyphs together
    fn set_quote(&mut self, quote: Quote) {
        self.glyphs = GlyphSequence::from_text(&quote.display_text());
        self.quote = quote;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current stage
    pub fn stage(&self) -> RevealStage {
        self.stage
    }

    /// Current quote (empty while loading)
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// Display units of the current quote
    pub fn glyphs(&self) -> &GlyphSequence {
        &self.glyphs
    }

    /// Text reveal flag (set from `TextRevealing` on)
    pub fn text_flag(&self) -> bool {
        self.stage.text_flag()
    }

    /// Glyphs should animate to revealed
    pub fn text_target(&self) -> bool {
        self.text_flag() && self.visible
    }

    /// Caption should animate to revealed
    pub fn caption_target(&self) -> bool {
        self.stage.caption_flag()
    }

    /// Whether the quote container is on-screen
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the sequencer is mounted
    pub fn is_started(&self) -> bool {
        self.mounted
    }

    /// Whether visibility is being observed
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether the color cycler is running
    pub fn is_cycling(&self) -> bool {
        self.cycler.as_ref().is_some_and(CyclerHandle::is_running)
    }

    /// Whether a fetch or a delay is outstanding
    pub fn has_pending_work(&self) -> bool {
        self.fetch_task.is_pending() || self.timer_task.is_pending()
    }

    /// Current cycle number
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Failed fetches since construction
    pub fn failed_fetches(&self) -> u64 {
        self.failed_fetches
    }

    /// Element observed for visibility
    pub fn element(&self) -> &ElementId {
        &self.element
    }

    /// Configuration in use
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Current palette cursor color (first palette color when not cycling)
    pub fn color(&self) -> Rgb {
        match self.palette_rx {
            Some(ref rx) => *rx.borrow(),
            None => self
                .config
                .palette
                .first()
                .copied()
                .unwrap_or(DEFAULT_PALETTE[0]),
        }
    }

    /// Everything the presentation layer needs right now
    pub fn snapshot(&self) -> RevealSnapshot {
        RevealSnapshot {
            cycle: self.cycle,
            stage: self.stage,
            quote: self.quote.clone(),
            glyphs: self.glyphs.clone(),
            text_target: self.text_target(),
            caption_target: self.caption_target(),
            visible: self.visible,
            color: self.color(),
        }
    }
}
