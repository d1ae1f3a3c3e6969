//! Typewriter Animator
//!
//! Reveals a text into a [`Surface`] one logical unit per tick:
//! - a newline becomes a [`Glyph::LineBreak`]
//! - two consecutive spaces become a single [`Glyph::WideSpace`]
//! - anything else is typed verbatim
//!
//! # Design
//!
//! The animator is a plain state machine. It never sleeps and never spawns;
//! whoever drives it (the [`Reel`](crate::reel::Reel) or a test) calls
//! [`Typewriter::tick`] whenever [`Typewriter::next_delay`] has elapsed.
//! Each tick does O(1) work and returns.
//!
//! # Phases
//!
//! ```text
//!   Idle ──claim()──▶ Loading ──start()──▶ Typing ──tick() past end──▶ Idle
//!    │                   │
//!    └──────start()──────┼──────────────▶ Typing
//!                        └──release()──▶ Idle
//! ```
//!
//! `Loading` exists so the scheduler can mark the animator busy while a
//! fetch is in flight without keeping a busy flag of its own.

use std::time::Duration;

use crate::surface::{Glyph, Surface};

/// Delay between two typed units unless configured otherwise
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// State of one animation run, dropped as soon as the buffer is exhausted
#[derive(Debug)]
struct AnimationState<S> {
    /// Where glyphs are appended
    surface: S,
    /// Source text as characters (indexing by char, not byte)
    buffer: Vec<char>,
    /// Index of the next unread character; never exceeds `buffer.len()`
    cursor: usize,
    /// Fixed delay between units
    interval: Duration,
}

#[derive(Debug)]
enum Phase<S> {
    Idle,
    Loading,
    Typing(AnimationState<S>),
}

/// Outcome of a single [`Typewriter::tick`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to do (idle or still loading)
    Idle,
    /// One unit was appended to the surface
    Typed(Glyph),
    /// The buffer was exhausted; the animator is idle again
    Finished,
}

/// Classify the unit starting at `cursor`
///
/// Returns `None` once `cursor` is at or past the end. The two-space
/// lookahead never reads out of bounds.
#[must_use]
pub fn next_glyph(buffer: &[char], cursor: usize) -> Option<Glyph> {
    let current = *buffer.get(cursor)?;
    let glyph = match current {
        '\n' => Glyph::LineBreak,
        ' ' if buffer.get(cursor + 1) == Some(&' ') => Glyph::WideSpace,
        c => Glyph::Char(c),
    };
    Some(glyph)
}

/// Number of units (and therefore typing ticks) a text will take
#[must_use]
pub fn unit_count(text: &str) -> usize {
    let buffer: Vec<char> = text.chars().collect();
    let mut cursor = 0;
    let mut units = 0;
    while let Some(glyph) = next_glyph(&buffer, cursor) {
        cursor += glyph.source_len();
        units += 1;
    }
    units
}

/// The typewriter animator
#[derive(Debug)]
pub struct Typewriter<S: Surface> {
    phase: Phase<S>,
    /// Delay before the next tick is due; `None` when nothing is pending
    next_delay: Option<Duration>,
}

impl<S: Surface> Typewriter<S> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            next_delay: None,
        }
    }

    /// Whether the animator is busy (loading or typing)
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Whether a text is actively being typed
    pub fn is_typing(&self) -> bool {
        matches!(self.phase, Phase::Typing(_))
    }

    /// Whether the animator is claimed but has no text yet
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Mark the animator busy ahead of a fetch
    ///
    /// Returns `false` (and changes nothing) unless the animator is idle.
    pub fn claim(&mut self) -> bool {
        if matches!(self.phase, Phase::Idle) {
            self.phase = Phase::Loading;
            true
        } else {
            false
        }
    }

    /// Drop a claim whose fetch failed
    ///
    /// Returns `false` if the animator was not loading.
    pub fn release(&mut self) -> bool {
        if matches!(self.phase, Phase::Loading) {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    /// Start typing `text` into `surface`
    ///
    /// Rejected (returns `false`, nothing changes) while another text is being
    /// typed. The first tick is due immediately.
    pub fn start(&mut self, surface: S, text: impl Into<String>, interval: Duration) -> bool {
        if self.is_typing() {
            tracing::debug!("Typewriter busy, start rejected");
            return false;
        }

        let text = text.into();
        self.phase = Phase::Typing(AnimationState {
            surface,
            buffer: text.chars().collect(),
            cursor: 0,
            interval,
        });
        self.next_delay = Some(Duration::ZERO);
        true
    }

    /// Advance by one unit
    pub fn tick(&mut self) -> Tick {
        let state = match &mut self.phase {
            Phase::Typing(state) => state,
            Phase::Idle | Phase::Loading => return Tick::Idle,
        };

        match next_glyph(&state.buffer, state.cursor) {
            Some(glyph) => {
                state.surface.append(glyph);
                state.cursor += glyph.source_len();
                self.next_delay = Some(state.interval);
                Tick::Typed(glyph)
            }
            None => {
                self.phase = Phase::Idle;
                self.next_delay = None;
                Tick::Finished
            }
        }
    }

    /// Delay until the next tick is due, if one is pending
    pub fn next_delay(&self) -> Option<Duration> {
        self.next_delay
    }

    /// Cursor and buffer length of the current run
    pub fn progress(&self) -> Option<(usize, usize)> {
        match &self.phase {
            Phase::Typing(state) => Some((state.cursor, state.buffer.len())),
            Phase::Idle | Phase::Loading => None,
        }
    }

    /// Interval of the current run
    pub fn interval(&self) -> Option<Duration> {
        match &self.phase {
            Phase::Typing(state) => Some(state.interval),
            Phase::Idle | Phase::Loading => None,
        }
    }
}

impl<S: Surface> Default for Typewriter<S> {
    fn default() -> Self {
        Self::new()
    }
}
