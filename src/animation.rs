// ============================================================================
// TIME SOURCE, VALUE ANIMATION & SCAN SCHEDULING
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;

/// Source of "now" for animations and the scan loop.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset_micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_micros: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        let _ = self
            .offset_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |offset| {
                Some(offset.saturating_add(micros))
            });
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.offset_micros.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }
}

/// Time curve applied to the interpolation fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    AccelerateDecelerate,
}

impl Easing {
    pub fn apply(self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::AccelerateDecelerate => {
                (((t + 1.0) * std::f32::consts::PI).cos() / 2.0 + 0.5).clamp(0.0, 1.0)
            }
        }
    }
}

/// Interpolates a float from `from` to `to` over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueAnimator {
    from: f32,
    to: f32,
    duration: Duration,
    easing: Easing,
    started_at: Instant,
}

impl ValueAnimator {
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing, started_at: Instant) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            started_at,
        }
    }

    /// Returns the animated value at `now` and whether the animation is over.
    pub fn sample(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let fraction = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.easing.apply(fraction);
        (self.from + (self.to - self.from) * eased, false)
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

/// Handle for the single pending one-degree scan step.
#[derive(Debug, Clone)]
pub struct ScanScheduler {
    interval: Duration,
    last_armed: Option<Instant>,
    pending: Option<Instant>,
}

impl ScanScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_armed: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Schedules the next step at `now + interval` unless one was armed less
    /// than an interval ago and is still pending.
    pub fn arm(&mut self, now: Instant) -> bool {
        let rested = self
            .last_armed
            .map_or(true, |last| now >= last + self.interval);
        if self.pending.is_some() && !rested {
            return false;
        }
        self.last_armed = Some(now);
        self.pending = Some(now + self.interval);
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending step if it is due, returning its due time.
    pub fn take_due(&mut self, now: Instant) -> Option<Instant> {
        match self.pending {
            Some(due) if due <= now => {
                self.pending = None;
                Some(due)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_saturates_instead_of_wrapping() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(5));
        clock.advance(Duration::MAX);
        assert_eq!(clock.elapsed(), Duration::from_micros(u64::MAX));
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_micros(u64::MAX));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.advance(Duration::from_millis(7));
        assert_eq!(clock.elapsed(), Duration::from_millis(7));
        assert_eq!(clock.now(), other.now());
    }

    #[test]
    fn easing_hits_both_ends() {
        for easing in [Easing::Linear, Easing::AccelerateDecelerate] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((Easing::AccelerateDecelerate.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::AccelerateDecelerate.apply(0.1) < 0.1);
    }

    #[test]
    fn animator_lands_exactly_on_target() {
        let clock = ManualClock::new();
        let animator = ValueAnimator::new(0.0, 98.0, Duration::from_millis(500), Easing::Linear, clock.now());
        assert_eq!(animator.sample(clock.now()), (0.0, false));
        clock.advance(Duration::from_millis(250));
        let (mid, done) = animator.sample(clock.now());
        assert!(!done);
        assert!((mid - 49.0).abs() < 0.01);
        clock.advance(Duration::from_millis(400));
        assert_eq!(animator.sample(clock.now()), (98.0, true));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let now = Instant::now();
        let animator = ValueAnimator::new(3.0, 7.0, Duration::ZERO, Easing::default(), now);
        assert_eq!(animator.sample(now), (7.0, true));
    }

    #[test]
    fn scheduler_fires_once_per_interval() {
        let clock = ManualClock::new();
        let mut scan = ScanScheduler::new(Duration::from_millis(2));
        assert!(scan.arm(clock.now()));
        // Already pending and armed just now.
        assert!(!scan.arm(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert_eq!(scan.take_due(clock.now()), None);
        clock.advance(Duration::from_millis(1));
        let due = scan.take_due(clock.now()).unwrap();
        assert!(!scan.is_pending());
        assert!(scan.arm(due));
    }

    #[test]
    fn cancel_drops_the_pending_step() {
        let clock = ManualClock::new();
        let mut scan = ScanScheduler::new(Duration::from_millis(2));
        scan.arm(clock.now());
        scan.cancel();
        clock.advance(Duration::from_millis(10));
        assert_eq!(scan.take_due(clock.now()), None);
        // Re-arming after a cancel works even within the interval.
        assert!(scan.arm(clock.now()));
    }
}
