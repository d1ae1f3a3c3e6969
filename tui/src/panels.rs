//! Panel Toggle
//!
//! The code reel and the about panel share one region. Swapping them fades
//! the visible panel out, then fades the other one in. Leaving the code
//! reel waits [`HIDE_DELAY`] first; coming back does not.

use std::time::{Duration, Instant};

use crate::fade::{Fade, FADE_DURATION};

/// Pause before the code reel starts fading out
pub const HIDE_DELAY: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Code,
    About,
}

impl Panel {
    pub fn other(self) -> Self {
        match self {
            Panel::Code => Panel::About,
            Panel::About => Panel::Code,
        }
    }
}

/// An in-progress swap
#[derive(Clone, Copy, Debug)]
struct Swap {
    to: Panel,
    out: Fade,
    fade_in: Fade,
}

#[derive(Debug)]
pub struct PanelToggle {
    shown: Panel,
    swap: Option<Swap>,
}

impl Default for PanelToggle {
    fn default() -> Self {
        Self {
            shown: Panel::Code,
            swap: None,
        }
    }
}

impl PanelToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel that is (or will be, once the swap ends) on screen
    pub fn target(&self) -> Panel {
        self.swap.map_or(self.shown, |swap| swap.to)
    }

    pub fn is_swapping(&self) -> bool {
        self.swap.is_some()
    }

    /// Start swapping to the other panel
    ///
    /// Returns `false` while a swap is already running.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.swap.is_some() {
            return false;
        }

        let to = self.shown.other();
        let out_start = match self.shown {
            Panel::Code => now + HIDE_DELAY,
            Panel::About => now,
        };
        let out = Fade::fade_out(out_start, FADE_DURATION);
        self.swap = Some(Swap {
            to,
            out,
            fade_in: Fade::fade_in(out.end(), FADE_DURATION),
        });
        tracing::debug!(to = ?to, "Swapping panels");
        true
    }

    /// Finish a swap whose fades are over
    pub fn update(&mut self, now: Instant) {
        if let Some(swap) = self.swap {
            if swap.fade_in.is_done(now) {
                self.shown = swap.to;
                self.swap = None;
            }
        }
    }

    /// Opacity of `panel` at `now`
    pub fn opacity(&self, panel: Panel, now: Instant) -> f32 {
        match self.swap {
            None if panel == self.shown => 1.0,
            None => 0.0,
            Some(swap) if panel == swap.to => swap.fade_in.level(now),
            Some(swap) => swap.out.level(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_starts_on_code() {
        let toggle = PanelToggle::new();
        let now = Instant::now();
        assert_eq!(toggle.target(), Panel::Code);
        assert_eq!(toggle.opacity(Panel::Code, now), 1.0);
        assert_eq!(toggle.opacity(Panel::About, now), 0.0);
    }

    #[test]
    fn test_hide_code_waits_then_fades() {
        let t0 = Instant::now();
        let mut toggle = PanelToggle::new();
        assert!(toggle.toggle(t0));
        assert_eq!(toggle.target(), Panel::About);

        // Delay: code fully visible
        assert_eq!(toggle.opacity(Panel::Code, t0 + ms(100)), 1.0);
        // Fading out
        let mid = toggle.opacity(Panel::Code, t0 + ms(350));
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(toggle.opacity(Panel::About, t0 + ms(350)), 0.0);
        // Code gone at 550ms, about fades in until 950ms
        assert_eq!(toggle.opacity(Panel::Code, t0 + ms(550)), 0.0);
        assert!(toggle.opacity(Panel::About, t0 + ms(750)) > 0.0);
        assert_eq!(toggle.opacity(Panel::About, t0 + ms(950)), 1.0);

        toggle.update(t0 + ms(900));
        assert!(toggle.is_swapping());
        toggle.update(t0 + ms(950));
        assert!(!toggle.is_swapping());
        assert_eq!(toggle.opacity(Panel::About, t0 + ms(950)), 1.0);
    }

    #[test]
    fn test_show_code_has_no_delay() {
        let t0 = Instant::now();
        let mut toggle = PanelToggle::new();
        toggle.toggle(t0);
        toggle.update(t0 + ms(950));

        let t1 = t0 + ms(2_000);
        assert!(toggle.toggle(t1));
        assert!(toggle.opacity(Panel::About, t1 + ms(100)) < 1.0);
        assert_eq!(toggle.opacity(Panel::Code, t1 + ms(800)), 1.0);
        toggle.update(t1 + ms(800));
        assert_eq!(toggle.target(), Panel::Code);
        assert!(!toggle.is_swapping());
    }

    #[test]
    fn test_toggle_ignored_mid_swap() {
        let t0 = Instant::now();
        let mut toggle = PanelToggle::new();
        assert!(toggle.toggle(t0));
        assert!(!toggle.toggle(t0 + ms(200)));
        assert_eq!(toggle.target(), Panel::About);
    }
}
