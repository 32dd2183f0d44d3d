//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, focus, resize)
//! - RevealSequencer for the staged reveal
//! - Fades and layout derived from the sequencer snapshot
//!
//! The app owns the viewport tracker the sequencer observes. After every
//! input or frame it reports how much of the quote card is on screen; the
//! sequencer decides what that means for the reveal.

use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};
use tokio::time::{Instant, MissedTickBehavior};

use reveal_core::{
    EasingFunction, QuoteSource, RevealConfig, RevealSequencer, RevealStage, ViewportTracker,
};

use crate::fade::StaggeredFade;
use crate::layout::{wrap_glyphs, GlyphLines, PageLayout};
use crate::theme::{self, STATUS_ERROR, STATUS_TEXT};
use crate::widgets::quote_card::{button_row, button_span};
use crate::widgets::{QuoteCard, Starfield};

/// ~30 FPS is plenty for fades
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Rows per mouse wheel notch
const SCROLL_STEP: u16 = 3;

/// Status bar height
const STATUS_HEIGHT: u16 = 1;

/// What woke the event loop
enum Action {
    Terminal(Event),
    Frame,
    Sequencer,
    Quit,
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// When the app was created (drives the starfield twinkle)
    started: Instant,

    // === Reveal ===
    sequencer: RevealSequencer<Box<dyn QuoteSource>>,
    /// Visibility capability handed to the sequencer
    tracker: ViewportTracker,
    glyph_fade: StaggeredFade,
    caption_fade: StaggeredFade,
    /// Cycle and glyph count the fades were built for
    fade_key: (u64, usize),

    // === Page ===
    /// Terminal size
    size: (u16, u16),
    /// Page scroll offset (rows)
    scroll: u16,
    /// Terminal has focus
    focused: bool,
    lines: GlyphLines,
    layout: PageLayout,
    stars: Starfield,
    /// Screen area of the retry button, when on screen
    button: Option<Rect>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: RevealConfig, source: Box<dyn QuoteSource>) -> Self {
        let tracker = ViewportTracker::new(config.visibility_threshold);
        let now = Instant::now().into_std();
        let glyph_fade = StaggeredFade::new(0, config.stagger, config.fade_duration, now);
        let caption_fade = StaggeredFade::new(1, Duration::ZERO, config.fade_duration, now)
            .with_easing(EasingFunction::EaseInOut);
        let sequencer = RevealSequencer::new(source, std::sync::Arc::new(tracker.clone()), config);

        Self {
            running: true,
            started: Instant::now(),
            sequencer,
            tracker,
            glyph_fade,
            caption_fade,
            fade_key: (0, 0),
            size: (0, 0),
            scroll: 0,
            focused: true,
            lines: vec![Vec::new()],
            layout: PageLayout::compute(Rect::default(), 1),
            stars: Starfield::default(),
            button: None,
        }
    }

    /// Mount the sequencer
    pub fn start(&mut self) {
        self.sequencer.start();
        self.refresh();
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);
        self.start();

        let mut events = EventStream::new();
        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let action = tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => Action::Terminal(event),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event error");
                        Action::Frame
                    }
                    None => Action::Quit,
                },
                _ = frames.tick() => Action::Frame,
                _ = self.sequencer.process_next_event() => Action::Sequencer,
            };

            match action {
                Action::Terminal(event) => self.handle_event(event),
                Action::Quit => self.running = false,
                Action::Frame | Action::Sequencer => {}
            }

            self.refresh();
            terminal.draw(|frame| self.draw(frame))?;
        }

        self.sequencer.dispose();
        tracing::info!("Quote TUI exiting");
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(width, height),
            Event::FocusGained => self.focused = true,
            Event::FocusLost => self.focused = false,
            _ => {}
        }
        self.refresh();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // New quote
            KeyCode::Char('r' | ' ') | KeyCode::Enter => self.retry(),

            // Page scrolling
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-i32::from(self.layout.viewport.height)),
            KeyCode::PageDown => self.scroll_by(i32::from(self.layout.viewport.height)),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.layout.max_scroll(),

            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-i32::from(SCROLL_STEP)),
            MouseEventKind::ScrollDown => self.scroll_by(i32::from(SCROLL_STEP)),
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .button
                    .is_some_and(|button| button.contains((mouse.column, mouse.row).into()));
                if hit {
                    self.retry();
                }
            }
            _ => {}
        }
    }

    /// Handle terminal resize
    fn resize(&mut self, width: u16, height: u16) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);
        self.stars = Starfield::for_area(width, height, &mut rand::thread_rng());
        tracing::debug!(width, height, "Terminal resized");
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.layout.max_scroll()));
        self.scroll = u16::try_from(next).unwrap_or(0);
    }

    /// Throw the current quote away and fetch another
    fn retry(&mut self) {
        tracing::info!(stage = %self.sequencer.stage(), "Retry requested");
        self.sequencer.retrigger();
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Recompute layout, report visibility and sync fades with the sequencer
    pub fn refresh(&mut self) {
        let viewport = self.viewport();
        let text_width = PageLayout::text_width(viewport);
        self.lines = wrap_glyphs(self.sequencer.glyphs(), usize::from(text_width));
        self.layout = PageLayout::compute(viewport, self.lines.len());
        self.scroll = self.scroll.min(self.layout.max_scroll());

        self.tracker.report(self.sequencer.element(), self.visible_fraction());
        self.sequencer.drain_ready();

        self.sync_fades();
    }

    fn sync_fades(&mut self) {
        let now = Instant::now().into_std();
        let key = (self.sequencer.cycle(), self.sequencer.glyphs().len());
        if key != self.fade_key {
            // New cycle or new quote: everything starts hidden
            self.glyph_fade.reset(key.1, now);
            self.caption_fade.reset(1, now);
            self.fade_key = key;
        }
        self.glyph_fade.set_target(self.sequencer.text_target(), now);
        self.caption_fade.set_target(self.sequencer.caption_target(), now);
    }

    fn viewport(&self) -> Rect {
        Rect::new(0, 0, self.size.0, self.size.1.saturating_sub(STATUS_HEIGHT))
    }

    /// Fraction of the quote card the user can see
    pub fn visible_fraction(&self) -> f32 {
        if self.focused {
            self.layout.visible_fraction(self.scroll)
        } else {
            0.0
        }
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Page scroll offset
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// The reveal sequencer
    pub fn sequencer(&self) -> &RevealSequencer<Box<dyn QuoteSource>> {
        &self.sequencer
    }

    /// The reveal sequencer, mutably
    pub fn sequencer_mut(&mut self) -> &mut RevealSequencer<Box<dyn QuoteSource>> {
        &mut self.sequencer
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the UI
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let viewport = self.viewport().intersection(area);
        let accent = self.sequencer.color();
        let buf = frame.buffer_mut();

        self.stars
            .sky(self.started.elapsed(), accent)
            .render(viewport, buf);
        self.button = self.render_card(viewport, buf);
        self.render_status(area, buf);
    }

    /// Render the card off-screen, then copy its visible rows onto the page
    fn render_card(&self, viewport: Rect, buf: &mut Buffer) -> Option<Rect> {
        let layout = self.layout;
        let rows = layout.visible_rows(self.scroll);
        if rows.is_empty() || layout.card_width == 0 {
            return None;
        }

        let now = Instant::now().into_std();
        let opacity: Vec<f32> = (0..self.glyph_fade.len())
            .map(|i| self.glyph_fade.opacity(i, now))
            .collect();
        let quote = self.sequencer.quote();

        let card_area = Rect::new(0, 0, layout.card_width, layout.card_height);
        let mut card = Buffer::empty(card_area);
        QuoteCard::new(self.sequencer.glyphs(), &self.lines, &opacity)
            .author(&quote.author)
            .caption_opacity(self.caption_fade.opacity(0, now))
            .accent(self.sequencer.color())
            .render(card_area, &mut card);

        for row in rows {
            let Some(y) = layout.screen_row(row, self.scroll) else {
                continue;
            };
            for x in 0..layout.card_width {
                let screen_x = layout.card_x + x;
                if screen_x < viewport.right() && y < viewport.bottom() {
                    buf[(screen_x, y)] = card[(x, row)].clone();
                }
            }
        }

        let row = button_row(layout.card_height);
        let y = layout.screen_row(row, self.scroll)?;
        let (start, end) = button_span(layout.card_width);
        Some(Rect::new(layout.card_x + start, y, end - start, 1).intersection(viewport))
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let y = area.bottom() - 1;

        let stalled =
            self.sequencer.stage() == RevealStage::AwaitingQuote && !self.sequencer.has_pending_work();
        let (state, color) = if stalled {
            ("couldn't fetch a quote", STATUS_ERROR)
        } else {
            (self.sequencer.stage().label(), STATUS_TEXT)
        };

        let status = format!(" {state} | r new quote | ↑↓ scroll | q quit");
        let style = Style::default()
            .fg(theme::color(color))
            .bg(theme::color(theme::BACKDROP));
        for x in area.left()..area.right() {
            buf[(x, y)].set_symbol(" ").set_style(style);
        }
        buf.set_stringn(area.x, y, status, area.width.into(), style);
    }
}
