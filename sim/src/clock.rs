//! Time sources for the frame loop.
//!
//! The scene never reads the wall clock itself. A [`Clock`] supplies
//! timestamps and a [`FrameClock`] turns consecutive timestamps into a
//! bounded per-frame step.

use std::collections::VecDeque;
use std::time::Instant;

/// Source of monotonically increasing timestamps in seconds.
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Wall-clock monotonic time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Replays a fixed list of timestamps, then repeats the last one.
#[derive(Debug, Clone, Default)]
pub struct SequenceClock {
    remaining: VecDeque<f64>,
    last: f64,
}

impl SequenceClock {
    pub fn new(timestamps: impl IntoIterator<Item = f64>) -> Self {
        Self {
            remaining: timestamps.into_iter().collect(),
            last: 0.0,
        }
    }

    /// Build timestamps from a sequence of frame gaps, starting at 0.
    pub fn from_gaps(gaps: impl IntoIterator<Item = f64>) -> Self {
        let mut t = 0.0;
        let mut timestamps = vec![t];
        for gap in gaps {
            t += gap;
            timestamps.push(t);
        }
        Self::new(timestamps)
    }
}

impl Clock for SequenceClock {
    fn now(&mut self) -> f64 {
        if let Some(t) = self.remaining.pop_front() {
            self.last = t;
        }
        self.last
    }
}

/// Clamp a raw frame gap to `[0, max_dt]`. Non-finite gaps count as zero.
#[inline]
pub fn clamp_dt(dt: f64, max_dt: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

/// Derives the step for each frame from consecutive timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self { last: None, max_dt }
    }

    /// Record `now` and return the clamped step since the previous call.
    /// The first call returns 0.
    pub fn tick(&mut self, now: f64) -> f64 {
        let dt = match self.last {
            None => 0.0,
            Some(prev) => {
                let raw = now - prev;
                if raw > self.max_dt {
                    tracing::debug!("Frame gap of {:.3}s clamped to {:.3}s", raw, self.max_dt);
                }
                clamp_dt(raw, self.max_dt)
            }
        };
        self.last = Some(now);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut fc = FrameClock::new(0.1);
        assert_eq!(fc.tick(1234.5), 0.0);
    }

    #[test]
    fn regular_gaps_pass_through() {
        let mut fc = FrameClock::new(0.1);
        fc.tick(1.0);
        assert!((fc.tick(1.016) - 0.016).abs() < 1e-12);
        assert!((fc.tick(1.032) - 0.016).abs() < 1e-12);
    }

    #[test]
    fn long_gap_is_clamped() {
        let mut fc = FrameClock::new(0.1);
        fc.tick(0.0);
        assert_eq!(fc.tick(0.5), 0.1);
    }

    #[test]
    fn backwards_time_gives_zero() {
        let mut fc = FrameClock::new(0.1);
        fc.tick(2.0);
        assert_eq!(fc.tick(1.5), 0.0);
        // Measured from the latest timestamp afterwards
        assert!((fc.tick(1.55) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn clamp_dt_rejects_nan() {
        assert_eq!(clamp_dt(f64::NAN, 0.1), 0.0);
        assert_eq!(clamp_dt(f64::INFINITY, 0.1), 0.0);
    }

    #[test]
    fn sequence_clock_replays_then_holds() {
        let mut clock = SequenceClock::new([0.0, 0.25, 0.5]);
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.now(), 0.25);
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.now(), 0.5);
    }

    #[test]
    fn sequence_clock_from_gaps_accumulates() {
        let mut clock = SequenceClock::from_gaps([0.1, 0.2]);
        assert_eq!(clock.now(), 0.0);
        assert!((clock.now() - 0.1).abs() < 1e-12);
        assert!((clock.now() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let mut clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
