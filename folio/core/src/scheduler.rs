//! Content Scheduler
//!
//! Decides, on every poll, whether a new file should be fetched. The
//! animator's running flag is the only busy signal: the scheduler claims the
//! animator before asking for a fetch and releases it if the fetch fails.

use std::time::Duration;

use crate::catalog::Catalog;
use crate::fetch::FetchError;
use crate::picker::IndexPicker;
use crate::surface::Surface;
use crate::typewriter::Typewriter;

/// What the driver should do after a poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollDecision {
    /// An animation is loading or typing; just poll again later
    Busy,
    /// The animator was claimed; fetch this identifier
    Fetch(String),
}

/// Result of handing a fetch outcome back to the scheduler
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The text is now being typed
    Started {
        /// Number of units the text will take
        units: usize,
    },
    /// The fetch failed; the animator is idle again
    Failed,
    /// The animator was not waiting for this text (should not happen with a
    /// single driver)
    Rejected,
}

/// Periodic picker of catalog entries
pub struct ContentScheduler<P: IndexPicker> {
    catalog: Catalog,
    picker: P,
    interval: Duration,
}

impl<P: IndexPicker> ContentScheduler<P> {
    /// Create a scheduler typing each file at `interval` per unit
    pub fn new(catalog: Catalog, picker: P, interval: Duration) -> Self {
        Self {
            catalog,
            picker,
            interval,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Typing interval handed to the animator
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One scheduler poll
    pub fn poll_tick<S: Surface>(&mut self, animator: &mut Typewriter<S>) -> PollDecision {
        if animator.is_running() {
            return PollDecision::Busy;
        }

        let index = self.picker.pick(self.catalog.len());
        // The picker contract keeps index in range; fall back to the first
        // entry rather than panic on a misbehaving picker.
        let identifier = self
            .catalog
            .get(index)
            .or_else(|| self.catalog.get(0))
            .map(str::to_string);

        match identifier {
            Some(identifier) if animator.claim() => {
                tracing::debug!(identifier = %identifier, index, "Picked sample file");
                PollDecision::Fetch(identifier)
            }
            _ => PollDecision::Busy,
        }
    }

    /// Hand a fetch outcome to the animator
    pub fn complete<S: Surface>(
        &self,
        animator: &mut Typewriter<S>,
        surface: S,
        identifier: &str,
        result: Result<String, FetchError>,
    ) -> Completion {
        match result {
            Ok(text) => {
                let units = crate::typewriter::unit_count(&text);
                if animator.start(surface, text, self.interval) {
                    Completion::Started { units }
                } else {
                    Completion::Rejected
                }
            }
            Err(error) => {
                tracing::warn!(identifier = %identifier, error = %error, "Fetch failed, will pick again");
                animator.release();
                Completion::Failed
            }
        }
    }
}
