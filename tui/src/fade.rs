//! Fades
//!
//! A terminal has no alpha channel, so fades are an opacity level in
//! `0.0..=1.0` that the renderer turns into a dimmed foreground color
//! (see [`crate::theme::faded`]). All timing takes an explicit `now` so the
//! transitions can be stepped in tests without a clock.

use std::time::{Duration, Instant};

/// Default fade duration (the jQuery `fadeIn()`/`fadeOut()` default)
pub const FADE_DURATION: Duration = Duration::from_millis(400);

/// A linear opacity ramp between two levels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl Fade {
    pub fn new(from: f32, to: f32, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// A fade that is already at `level`
    pub fn settled(level: f32, now: Instant) -> Self {
        Self::new(level, level, now, Duration::ZERO)
    }

    pub fn fade_in(start: Instant, duration: Duration) -> Self {
        Self::new(0.0, 1.0, start, duration)
    }

    pub fn fade_out(start: Instant, duration: Duration) -> Self {
        Self::new(1.0, 0.0, start, duration)
    }

    /// Opacity at `now`
    pub fn level(&self, now: Instant) -> f32 {
        if now <= self.start {
            return self.from;
        }
        let elapsed = now - self.start;
        if elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }

    /// Level the fade ends at
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn end(&self) -> Instant {
        self.start + self.duration
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now >= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ramp() {
        let t0 = Instant::now();
        let fade = Fade::fade_in(t0, Duration::from_millis(400));

        assert_eq!(fade.level(t0), 0.0);
        assert!((fade.level(t0 + Duration::from_millis(100)) - 0.25).abs() < 1e-3);
        assert!((fade.level(t0 + Duration::from_millis(200)) - 0.5).abs() < 1e-3);
        assert_eq!(fade.level(t0 + Duration::from_millis(400)), 1.0);
        assert_eq!(fade.level(t0 + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_delayed_start_holds_initial_level() {
        let t0 = Instant::now();
        let fade = Fade::fade_out(t0 + Duration::from_millis(150), FADE_DURATION);

        assert_eq!(fade.level(t0), 1.0);
        assert_eq!(fade.level(t0 + Duration::from_millis(150)), 1.0);
        assert!(!fade.is_done(t0 + Duration::from_millis(500)));
        assert!(fade.is_done(t0 + Duration::from_millis(550)));
        assert_eq!(fade.level(t0 + Duration::from_millis(550)), 0.0);
    }

    #[test]
    fn test_settled_is_constant() {
        let t0 = Instant::now();
        let fade = Fade::settled(0.7, t0);
        assert!(fade.is_done(t0));
        assert_eq!(fade.level(t0 + Duration::from_secs(1)), 0.7);
        assert_eq!(fade.target(), 0.7);
    }
}
