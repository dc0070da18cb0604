#![forbid(unsafe_code)]

//! Fade curves for close animations.
//!
//! Every closing widget (overlay, focus, popover, tip, hover) fades its
//! opacity with the same quadratic ease-out: at time fraction `t` in `[0, 1]`
//! the opacity is `max(from - t², 0)`. Starting from `1.0` this is the
//! familiar `1 - t²`; starting lower (an overlay at `0.75`) the node simply
//! reaches zero a little before the animation ends.
//!
//! # Invariants
//!
//! 1. [`Fade::value_at`] is deterministic given elapsed time.
//! 2. Values are always in `[0, from]`.
//! 3. A zero-duration fade is complete immediately.

use std::time::Duration;

/// Quadratic ease-out from `from` toward zero.
#[inline]
pub fn quadratic_fade(from: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (from - t * t).max(0.0)
}

/// A single opacity fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f64,
    duration: Duration,
}

impl Fade {
    /// Create a fade starting at opacity `from`. Non-finite or negative
    /// starting values are treated as fully transparent.
    pub fn new(from: f64, duration: Duration) -> Self {
        let from = if from.is_finite() { from.clamp(0.0, 1.0) } else { 0.0 };
        Self { from, duration }
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fraction of the animation elapsed, in `[0, 1]`.
    pub fn fraction(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Opacity after `elapsed`.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        quadratic_fade(self.from, self.fraction(elapsed))
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        self.fraction(elapsed) >= 1.0
    }
}

/// Format an opacity with at most three decimals (`0.563`, `1`, `0`).
pub fn format_opacity(value: f64) -> String {
    let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_owned()
    } else {
        text.to_owned()
    }
}

/// Parse an opacity string, falling back to `default` when absent or invalid.
pub fn parse_opacity(text: Option<&str>, default: f64) -> f64 {
    text.and_then(|t| t.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_fade_endpoints() {
        assert_eq!(quadratic_fade(1.0, 0.0), 1.0);
        assert_eq!(quadratic_fade(1.0, 1.0), 0.0);
        assert_eq!(quadratic_fade(1.0, 0.5), 0.75);
        assert_eq!(quadratic_fade(0.75, 1.0), 0.0);
        assert_eq!(quadratic_fade(0.25, 0.6), 0.0);
    }

    #[test]
    fn quadratic_fade_clamps_time() {
        assert_eq!(quadratic_fade(1.0, -3.0), 1.0);
        assert_eq!(quadratic_fade(1.0, 7.0), 0.0);
    }

    #[test]
    fn fade_is_monotonic() {
        let fade = Fade::new(0.75, Duration::from_millis(300));
        let mut last = f64::INFINITY;
        for ms in (0..=320).step_by(16) {
            let v = fade.value_at(Duration::from_millis(ms));
            assert!(v <= last);
            assert!((0.0..=0.75).contains(&v));
            last = v;
        }
        assert!(fade.is_complete(Duration::from_millis(300)));
        assert!(!fade.is_complete(Duration::from_millis(299)));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let fade = Fade::new(1.0, Duration::ZERO);
        assert!(fade.is_complete(Duration::ZERO));
        assert_eq!(fade.value_at(Duration::ZERO), 0.0);
    }

    #[test]
    fn fade_sanitizes_start() {
        assert_eq!(Fade::new(f64::NAN, Duration::ZERO).from(), 0.0);
        assert_eq!(Fade::new(3.0, Duration::ZERO).from(), 1.0);
        assert_eq!(Fade::new(-1.0, Duration::ZERO).from(), 0.0);
    }

    #[test]
    fn opacity_formatting() {
        assert_eq!(format_opacity(1.0), "1");
        assert_eq!(format_opacity(0.0), "0");
        assert_eq!(format_opacity(0.5626), "0.563");
        assert_eq!(format_opacity(0.75), "0.75");
        assert_eq!(format_opacity(f64::NAN), "0");
    }

    #[test]
    fn opacity_parsing() {
        assert_eq!(parse_opacity(Some("0.4"), 1.0), 0.4);
        assert_eq!(parse_opacity(Some(" junk "), 1.0), 1.0);
        assert_eq!(parse_opacity(None, 0.75), 0.75);
    }
}
