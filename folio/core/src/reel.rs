//! Reel - the driver loop
//!
//! Owns the animator, the scheduler and the surface handle, and steps them
//! from a single `tokio::select!` loop:
//!
//! ```text
//!            ┌──────────── poll interval ────────────┐
//!            ▼                                       │
//!   scheduler.poll_tick ──Fetch(id)──▶ spawned GET ──┼──▶ fetch channel
//!            │                                       │         │
//!          Busy                                      │         ▼
//!            └───────────────────────────────────────┘  scheduler.complete
//!                                                               │
//!   animator deadline ──▶ animator.tick ◀──────── start ────────┘
//! ```
//!
//! Only this loop touches the animator and scheduler, so there is exactly
//! one logical thread of control. Spawned fetch tasks never touch shared
//! state; they report back over a channel owned by the reel, so a fetch
//! that outlives one call to [`Reel::run`] is picked up by the next.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::FolioConfig;
use crate::error::Result;
use crate::fetch::{ContentFetcher, FetchError, HttpFetcher};
use crate::picker::{IndexPicker, UniformPicker};
use crate::scheduler::{Completion, ContentScheduler, PollDecision};
use crate::surface::SharedSurface;
use crate::typewriter::{Tick, Typewriter};

/// Events emitted by the reel for UI surfaces
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReelEvent {
    /// A file was picked and its fetch issued
    FetchStarted { identifier: String },
    /// The fetched text started typing
    AnimationStarted { identifier: String, units: usize },
    /// The text was fully typed
    AnimationFinished { identifier: String },
    /// The fetch failed; nothing will be typed this cycle
    FetchFailed { identifier: String, error: String },
}

/// What the reel is doing right now
///
/// Published through a [`watch`] channel, so readers always see the latest
/// value even when [`ReelEvent`]s were dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReelState {
    #[default]
    Idle,
    Loading { identifier: String },
    Typing { identifier: String, units: usize },
}

/// Counters kept by the reel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReelStats {
    pub fetches: u64,
    pub fetch_failures: u64,
    pub animations_completed: u64,
}

type FetchOutcome = (String, std::result::Result<String, FetchError>);

/// The driver loop
pub struct Reel<F: ContentFetcher + 'static, P: IndexPicker> {
    animator: Typewriter<SharedSurface>,
    scheduler: ContentScheduler<P>,
    surface: SharedSurface,
    fetcher: Arc<F>,
    poll_interval: Duration,
    clear_between_runs: bool,
    max_lines: usize,
    events: Option<mpsc::Sender<ReelEvent>>,
    state: watch::Sender<ReelState>,
    done_tx: mpsc::Sender<FetchOutcome>,
    done_rx: mpsc::Receiver<FetchOutcome>,
    /// Identifier of the file being loaded or typed
    current: Option<String>,
    stats: ReelStats,
}

impl Reel<HttpFetcher, UniformPicker> {
    /// Reel fetching over HTTP with uniform random picks
    pub fn http(config: &FolioConfig, surface: SharedSurface) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.base_url.clone(), config.fetch_timeout)?;
        Ok(Self::new(config, fetcher, UniformPicker::new(), surface))
    }
}

impl<F: ContentFetcher + 'static, P: IndexPicker> Reel<F, P> {
    pub fn new(config: &FolioConfig, fetcher: F, picker: P, surface: SharedSurface) -> Self {
        let (done_tx, done_rx) = mpsc::channel(4);
        Self {
            animator: Typewriter::new(),
            scheduler: ContentScheduler::new(config.catalog.clone(), picker, config.tick_interval),
            surface,
            fetcher: Arc::new(fetcher),
            poll_interval: config.poll_interval,
            clear_between_runs: config.clear_between_runs,
            max_lines: config.max_lines,
            events: None,
            state: watch::Sender::new(ReelState::Idle),
            done_tx,
            done_rx,
            current: None,
            stats: ReelStats::default(),
        }
    }

    /// Send [`ReelEvent`]s to `tx`
    #[must_use]
    pub fn with_events(mut self, tx: mpsc::Sender<ReelEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Subscribe to the latest [`ReelState`]
    pub fn state(&self) -> watch::Receiver<ReelState> {
        self.state.subscribe()
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn stats(&self) -> ReelStats {
        self.stats
    }

    /// Whether a file is loading or typing
    pub fn is_running(&self) -> bool {
        self.animator.is_running()
    }

    /// Run until `shutdown` resolves
    ///
    /// May be called again afterwards: a file that was loading or typing
    /// when the previous run stopped carries on where it left off.
    pub async fn run<S>(&mut self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut deadline = self.next_deadline();
        tokio::pin!(shutdown);

        tracing::debug!(
            fetcher = self.fetcher.name(),
            files = self.scheduler.catalog().len(),
            "Reel started"
        );

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                Some((identifier, result)) = self.done_rx.recv() => {
                    deadline = self.on_fetched(identifier, result);
                }

                _ = wait_until(deadline) => {
                    deadline = self.on_tick();
                }

                _ = poll.tick() => self.on_poll(),
            }
        }

        tracing::debug!(stats = ?self.stats, "Reel stopped");
    }

    fn on_poll(&mut self) {
        let identifier = match self.scheduler.poll_tick(&mut self.animator) {
            PollDecision::Busy => return,
            PollDecision::Fetch(identifier) => identifier,
        };

        self.stats.fetches += 1;
        self.current = Some(identifier.clone());
        self.state.send_replace(ReelState::Loading {
            identifier: identifier.clone(),
        });
        self.emit(ReelEvent::FetchStarted {
            identifier: identifier.clone(),
        });

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&identifier).await;
            let _ = tx.send((identifier, result)).await;
        });
    }

    fn on_fetched(
        &mut self,
        identifier: String,
        result: std::result::Result<String, FetchError>,
    ) -> Option<Instant> {
        let error = result.as_ref().err().map(ToString::to_string);

        if result.is_ok() {
            if self.clear_between_runs {
                self.surface.clear();
            } else {
                let trimmed = self.surface.trim_to_lines(self.max_lines);
                if trimmed > 0 {
                    tracing::trace!(trimmed, "Trimmed old lines from surface");
                }
            }
        }

        match self
            .scheduler
            .complete(&mut self.animator, self.surface.clone(), &identifier, result)
        {
            Completion::Started { units } => {
                tracing::debug!(identifier = %identifier, units, "Typing sample file");
                self.state.send_replace(ReelState::Typing {
                    identifier: identifier.clone(),
                    units,
                });
                self.emit(ReelEvent::AnimationStarted { identifier, units });
            }
            Completion::Failed => {
                self.stats.fetch_failures += 1;
                self.current = None;
                self.state.send_replace(ReelState::Idle);
                self.emit(ReelEvent::FetchFailed {
                    identifier,
                    error: error.unwrap_or_default(),
                });
            }
            Completion::Rejected => {
                tracing::warn!(identifier = %identifier, "Fetched text arrived while typing, dropped");
            }
        }

        self.next_deadline()
    }

    fn on_tick(&mut self) -> Option<Instant> {
        if self.animator.tick() == Tick::Finished {
            self.stats.animations_completed += 1;
            self.state.send_replace(ReelState::Idle);
            if let Some(identifier) = self.current.take() {
                tracing::debug!(identifier = %identifier, "Finished typing");
                self.emit(ReelEvent::AnimationFinished { identifier });
            }
        }
        self.next_deadline()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.animator.next_delay().map(|delay| Instant::now() + delay)
    }

    fn emit(&self, event: ReelEvent) {
        if let Some(tx) = &self.events {
            if let Err(e) = tx.try_send(event) {
                tracing::trace!(error = %e, "Reel event dropped");
            }
        }
    }
}

/// Resolve at `deadline`, or never when there is none
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
