//! Main Application
//!
//! The App is a thin display client over the headless reel:
//! - the [`Reel`] runs as its own task and types into a [`SharedSurface`]
//! - reel events update the status line
//! - terminal events drive the link bar, the title label and the panel toggle
//! - every frame the surface snapshot is drawn through the compositor

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use folio_core::{
    ContentFetcher, FolioConfig, IndexPicker, Reel, ReelEvent, ReelState, ReelStats,
    SharedSurface, StaticFetcher, UniformPicker,
};

use crate::compositor::{Compositor, LayerId};
use crate::links::{Hover, LinkBar, LinkKind, TitleLabel, LINKS};
use crate::panels::{Panel, PanelToggle};
use crate::theme::{DIM_GRAY, ERROR_RED, LINK_IDLE};
use crate::widgets::{AboutPanel, CodeView, CodeViewState};

/// ~30 FPS is plenty for 50ms typing and 400ms fades
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Reel events buffered between frames
const EVENT_BUFFER: usize = 64;

/// Rows moved per scroll step
const SCROLL_STEP: i32 = 3;

const HINTS: &str = "a about · PgUp/PgDn scroll · q quit ";

/// Screen regions, recomputed on every resize
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    pub links: Rect,
    pub panel: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let w = area.width;
        let h = area.height;
        Self {
            title: Rect::new(0, 0, w, h.min(1)),
            links: Rect::new(0, 1.min(h), w, h.saturating_sub(1).min(1)),
            panel: Rect::new(0, 2.min(h), w, h.saturating_sub(3)),
            status: Rect::new(0, h.saturating_sub(1), w, h.min(1)),
        }
    }
}

/// What the status line says about the reel
#[derive(Clone, Debug, PartialEq, Eq)]
enum Status {
    Starting,
    Loading(String),
    Typing { identifier: String, units: usize },
    Finished(String),
    Failed { identifier: String, error: String },
}

impl Status {
    fn describe(&self) -> String {
        match self {
            Status::Starting => "starting".to_string(),
            Status::Loading(id) => format!("loading {}", id),
            Status::Typing { identifier, units } => {
                format!("typing {} ({} units)", identifier, units)
            }
            Status::Finished(id) => format!("typed {}", id),
            Status::Failed { identifier, error } => format!("could not load {}: {}", identifier, error),
        }
    }

    /// Correct the status against the reel's latest state
    ///
    /// Events can be dropped when the channel is full; the state cannot. A
    /// run the reel has moved past is shown as finished.
    fn reconcile(self, state: &ReelState) -> Self {
        match (self, state) {
            (Status::Typing { identifier, .. }, ReelState::Typing { identifier: current, .. })
                if identifier != *current =>
            {
                Status::from_state(state).unwrap_or(Status::Finished(identifier))
            }
            (Status::Typing { identifier, .. }, ReelState::Idle | ReelState::Loading { .. }) => {
                Status::Finished(identifier)
            }
            (status, ReelState::Typing { .. }) if !matches!(status, Status::Typing { .. }) => {
                Status::from_state(state).unwrap_or(status)
            }
            (status, _) => status,
        }
    }

    fn from_state(state: &ReelState) -> Option<Self> {
        match state {
            ReelState::Idle => None,
            ReelState::Loading { identifier } => Some(Status::Loading(identifier.clone())),
            ReelState::Typing { identifier, units } => Some(Status::Typing {
                identifier: identifier.clone(),
                units: *units,
            }),
        }
    }

    fn file(&self) -> Option<&str> {
        match self {
            Status::Loading(id) | Status::Finished(id) => Some(id),
            Status::Typing { identifier, .. } => Some(identifier),
            Status::Starting | Status::Failed { .. } => None,
        }
    }
}

/// The spawned reel and its stop signal
struct ReelTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<ReelStats>,
}

/// Layer IDs for UI regions
struct AppLayers {
    code: LayerId,
    about: LayerId,
    title: LayerId,
    links: LayerId,
    status: LayerId,
}

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,

    // === Reel ===
    surface: SharedSurface,
    /// Last surface snapshot and its revision
    code_text: String,
    code_revision: u64,
    reel: Option<ReelTask>,
    events: mpsc::Receiver<ReelEvent>,
    reel_state: watch::Receiver<ReelState>,
    status: Status,

    // === UI Components ===
    compositor: Compositor,
    layers: AppLayers,
    layout: AppLayout,
    link_bar: LinkBar,
    title: TitleLabel,
    panels: PanelToggle,
    code_state: CodeViewState,
}

impl App {
    /// Create an App sized to the terminal and start its reel
    ///
    /// With `offline` the reel types the built-in samples instead of
    /// fetching over HTTP.
    pub fn new(config: &FolioConfig, offline: bool) -> anyhow::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Self::with_area(config, offline, Rect::new(0, 0, width, height))
    }

    /// Create an App for a given screen area (must run inside a runtime)
    pub fn with_area(config: &FolioConfig, offline: bool, area: Rect) -> anyhow::Result<Self> {
        let surface = SharedSurface::new();
        let (tx, events) = mpsc::channel(EVENT_BUFFER);

        let (reel, reel_state) = if offline {
            tracing::info!("Offline, typing built-in samples");
            let reel = Reel::new(
                config,
                StaticFetcher::samples(),
                UniformPicker::new(),
                surface.clone(),
            );
            let reel_state = reel.state();
            (spawn_reel(reel.with_events(tx)), reel_state)
        } else {
            tracing::info!(base_url = %config.base_url, "Fetching sample files over HTTP");
            let reel = Reel::http(config, surface.clone())?;
            let reel_state = reel.state();
            (spawn_reel(reel.with_events(tx)), reel_state)
        };

        let layout = AppLayout::new(area);
        let mut compositor = Compositor::new(area);
        let layers = AppLayers {
            code: compositor.create_layer(layout.panel, 0),
            about: compositor.create_layer(layout.panel, 1),
            title: compositor.create_layer(layout.title, 10),
            links: compositor.create_layer(layout.links, 10),
            status: compositor.create_layer(layout.status, 10),
        };
        compositor.set_visible(layers.about, false);

        Ok(Self {
            running: true,
            surface,
            code_text: String::new(),
            code_revision: 0,
            reel: Some(reel),
            events,
            reel_state,
            status: Status::Starting,
            compositor,
            layers,
            layout,
            link_bar: LinkBar::new(),
            title: TitleLabel::new(Instant::now()),
            panels: PanelToggle::new(),
            code_state: CodeViewState::default(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame = tokio::time::interval(FRAME_INTERVAL);
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event, Instant::now()),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                Some(event) = self.events.recv() => self.apply_reel_event(event),

                _ = frame.tick() => {}
            }

            self.update(Instant::now());
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Stop the reel and collect its counters
    pub async fn shutdown(&mut self) -> Option<ReelStats> {
        let task = self.reel.take()?;
        let _ = task.stop.send(());
        match task.handle.await {
            Ok(stats) => {
                tracing::info!(
                    fetches = stats.fetches,
                    failures = stats.fetch_failures,
                    completed = stats.animations_completed,
                    "Reel stopped"
                );
                Some(stats)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reel task did not stop cleanly");
                None
            }
        }
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('a') => self.toggle_panel(now),
            KeyCode::PageUp | KeyCode::Up => self.code_state.scroll(SCROLL_STEP),
            KeyCode::PageDown | KeyCode::Down => self.code_state.scroll(-SCROLL_STEP),
            KeyCode::End => self.code_state.follow(),
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let x = self.link_column(mouse.column, mouse.row);
                match self.link_bar.hover(self.layout.links.width, x) {
                    Hover::Entered(index) => self.title.display_title(LINKS[index].title, now),
                    Hover::Left => self.title.hide_title(now),
                    Hover::Unchanged => {}
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let link = self
                    .link_column(mouse.column, mouse.row)
                    .and_then(|x| LinkBar::link_at(self.layout.links.width, x));
                if let Some(index) = link {
                    if LINKS[index].kind == LinkKind::About {
                        self.toggle_panel(now);
                    }
                }
            }
            MouseEventKind::ScrollUp => self.code_state.scroll(SCROLL_STEP),
            MouseEventKind::ScrollDown => self.code_state.scroll(-SCROLL_STEP),
            _ => {}
        }
    }

    /// Column within the link bar, if the pointer is on it
    fn link_column(&self, x: u16, y: u16) -> Option<u16> {
        if self.compositor.layer_at(x, y) == Some(self.layers.links) {
            Some(x - self.layout.links.x)
        } else {
            None
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        self.layout = AppLayout::new(area);
        self.compositor.resize(area);

        self.compositor.place_layer(self.layers.code, self.layout.panel);
        self.compositor.place_layer(self.layers.about, self.layout.panel);
        self.compositor.place_layer(self.layers.title, self.layout.title);
        self.compositor.place_layer(self.layers.links, self.layout.links);
        self.compositor.place_layer(self.layers.status, self.layout.status);
    }

    fn toggle_panel(&mut self, now: Instant) {
        if !self.panels.toggle(now) {
            tracing::debug!("Panel swap already running");
        }
    }

    fn apply_reel_event(&mut self, event: ReelEvent) {
        self.status = match event {
            ReelEvent::FetchStarted { identifier } => Status::Loading(identifier),
            ReelEvent::AnimationStarted { identifier, units } => {
                Status::Typing { identifier, units }
            }
            ReelEvent::AnimationFinished { identifier } => Status::Finished(identifier),
            ReelEvent::FetchFailed { identifier, error } => Status::Failed { identifier, error },
        };
    }

    /// Advance fades, layer visibility and the status line
    fn update(&mut self, now: Instant) {
        let state = self.reel_state.borrow().clone();
        self.status = std::mem::replace(&mut self.status, Status::Starting).reconcile(&state);

        self.panels.update(now);
        let code = self.panels.opacity(Panel::Code, now) > 0.0;
        let about = self.panels.opacity(Panel::About, now) > 0.0;
        self.compositor.set_visible(self.layers.code, code);
        self.compositor.set_visible(self.layers.about, about);
    }

    /// Render the UI
    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let now = Instant::now();
        self.render_code(now);
        self.render_about(now);
        self.render_title(now);
        self.render_links();
        self.render_status();

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let Some(cell) = output.cell((x, y)) {
                        buf[(x, y)] = cell.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    fn render_code(&mut self, now: Instant) {
        if !self.compositor.is_visible(self.layers.code) {
            return;
        }
        if self.surface.revision() != self.code_revision {
            (self.code_text, self.code_revision) = self.surface.snapshot();
        }
        let level = self.panels.opacity(Panel::Code, now);
        let typing = matches!(self.status, Status::Typing { .. });
        let title = self.status.file().map(|f| format!(" {} ", f)).unwrap_or_default();

        if let Some(buf) = self.compositor.draw_layer(self.layers.code) {
            let area = buf.area;
            CodeView::new(&self.code_text)
                .title(&title)
                .cursor(typing)
                .level(level)
                .render(area, buf, &mut self.code_state);
        }
    }

    fn render_about(&mut self, now: Instant) {
        if !self.compositor.is_visible(self.layers.about) {
            return;
        }
        let level = self.panels.opacity(Panel::About, now);
        if let Some(buf) = self.compositor.draw_layer(self.layers.about) {
            let area = buf.area;
            AboutPanel::new(level).render(area, buf);
        }
    }

    fn render_title(&mut self, now: Instant) {
        if let Some(buf) = self.compositor.draw_layer(self.layers.title) {
            let area = buf.area;
            self.title.render(buf, area, now);
        }
    }

    fn render_links(&mut self) {
        if let Some(buf) = self.compositor.draw_layer(self.layers.links) {
            let area = buf.area;
            self.link_bar.render(buf, area);
        }
    }

    /// Render status bar
    fn render_status(&mut self) {
        if let Some(buf) = self.compositor.draw_layer(self.layers.status) {
            let area = buf.area;
            if area.width == 0 {
                return;
            }

            let style = match self.status {
                Status::Failed { .. } => Style::default().fg(ERROR_RED),
                _ => Style::default().fg(DIM_GRAY),
            };
            let status = format!(" {}", self.status.describe());
            buf.set_stringn(area.x, area.y, &status, area.width as usize, style);

            let hints_width = HINTS.chars().count() as u16;
            if area.width > hints_width + status.chars().count() as u16 {
                buf.set_string(
                    area.x + area.width - hints_width,
                    area.y,
                    HINTS,
                    Style::default().fg(LINK_IDLE),
                );
            }
        }
    }
}

/// Run a reel on its own task until told to stop
fn spawn_reel<F, P>(mut reel: Reel<F, P>) -> ReelTask
where
    F: ContentFetcher + 'static,
    P: IndexPicker + 'static,
{
    let (stop, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        reel.run(async {
            let _ = stop_rx.await;
        })
        .await;
        reel.stats()
    });
    ReelTask { stop, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    fn offline_app(width: u16, height: u16) -> App {
        App::with_area(&FolioConfig::default(), true, Rect::new(0, 0, width, height)).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_layout_regions() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.title, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.links, Rect::new(0, 1, 80, 1));
        assert_eq!(layout.panel, Rect::new(0, 2, 80, 21));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_layout_tiny_terminal() {
        let layout = AppLayout::new(Rect::new(0, 0, 10, 1));
        assert_eq!(layout.panel.height, 0);
        assert_eq!(layout.links.height, 0);
    }

    fn typing(identifier: &str, units: usize) -> Status {
        Status::Typing {
            identifier: identifier.into(),
            units,
        }
    }

    #[test]
    fn test_status_counts_units() {
        assert_eq!(typing("/a", 6).describe(), "typing /a (6 units)");
    }

    #[test]
    fn test_dropped_finish_event_is_reconciled() {
        // The reel went idle but the AnimationFinished event never arrived
        let status = typing("/a", 6).reconcile(&ReelState::Idle);
        assert_eq!(status, Status::Finished("/a".into()));

        let status = typing("/a", 6).reconcile(&ReelState::Loading {
            identifier: "/b".into(),
        });
        assert_eq!(status, Status::Finished("/a".into()));

        let status = typing("/a", 6).reconcile(&ReelState::Typing {
            identifier: "/b".into(),
            units: 3,
        });
        assert_eq!(status, typing("/b", 3));
    }

    #[test]
    fn test_dropped_start_event_is_reconciled() {
        let state = ReelState::Typing {
            identifier: "/a".into(),
            units: 4,
        };
        assert_eq!(Status::Loading("/a".into()).reconcile(&state), typing("/a", 4));
        assert_eq!(typing("/a", 4).reconcile(&state), typing("/a", 4));
        assert_eq!(
            Status::Finished("/z".into()).reconcile(&ReelState::Idle),
            Status::Finished("/z".into())
        );
    }

    #[tokio::test]
    async fn test_update_clears_stale_typing_status() {
        let mut app = offline_app(41, 12);
        app.apply_reel_event(ReelEvent::AnimationStarted {
            identifier: "/gone".into(),
            units: 3,
        });

        // The spawned reel has not run yet, so its state is still idle
        app.update(Instant::now());
        assert_eq!(app.status, Status::Finished("/gone".into()));
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_quit_keys() {
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let mut app = offline_app(41, 12);
            app.handle_event(event, Instant::now());
            assert!(!app.is_running());
            assert!(app.shutdown().await.is_some());
        }
    }

    #[tokio::test]
    async fn test_about_key_swaps_panels() {
        let mut app = offline_app(41, 12);
        let t0 = Instant::now();

        app.handle_event(key(KeyCode::Char('a')), t0);
        assert_eq!(app.panels.target(), Panel::About);

        app.update(t0 + Duration::from_secs(1));
        assert!(!app.compositor.is_visible(app.layers.code));
        assert!(app.compositor.is_visible(app.layers.about));
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_hover_and_click_about_link() {
        let mut app = offline_app(41, 12);
        let t0 = Instant::now();

        // "about" starts at column 31 on the link row
        app.handle_event(mouse(MouseEventKind::Moved, 32, 1), t0);
        assert_eq!(app.title.text(), "About Me");
        assert_eq!(app.title.level(t0 + Duration::from_secs(1)), 1.0);

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 32, 1), t0);
        assert_eq!(app.panels.target(), Panel::About);

        // Leaving the bar fades the title out
        let t1 = t0 + Duration::from_secs(1);
        app.handle_event(mouse(MouseEventKind::Moved, 5, 6), t1);
        assert_eq!(app.title.level(t1 + Duration::from_secs(1)), 0.0);
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_external_link_click_keeps_panel() {
        let mut app = offline_app(41, 12);
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 1), Instant::now());
        assert_eq!(app.panels.target(), Panel::Code);
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_resize_moves_layers() {
        let mut app = offline_app(41, 12);
        app.handle_event(Event::Resize(60, 20), Instant::now());

        assert_eq!(app.compositor.bounds(app.layers.status), Some(Rect::new(0, 19, 60, 1)));
        assert_eq!(app.compositor.bounds(app.layers.code), Some(Rect::new(0, 2, 60, 17)));
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_render_draws_links_and_status() {
        let mut app = offline_app(41, 12);
        app.apply_reel_event(ReelEvent::FetchFailed {
            identifier: "/x".into(),
            error: "boom".into(),
        });

        let mut terminal = Terminal::new(TestBackend::new(41, 12)).unwrap();
        app.render(&mut terminal).unwrap();

        let buf = terminal.backend().buffer();
        let row = |y: u16| -> String { (0..41).map(|x| buf[(x, y)].symbol().to_string()).collect() };
        assert!(row(1).contains("fb   git   li   cv   em   about"));
        assert!(row(11).starts_with(" could not load /x: boom"));
        assert_eq!(buf[(0, 2)].symbol(), "┌");
        app.shutdown().await;
    }
}
