use std::time::{Duration, Instant};

/// Default simulation time added per animation tick.
pub const DEFAULT_TIME_STEP: f64 = 0.05;
/// Default minimum spacing between throttled recomputations.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(50);

/// Why a tick asked for a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The configuration changed; bypasses throttling.
    Immediate,
    /// Regular animation step.
    Scheduled,
}

/// Recomputation request handed back by [`SimulationClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub time: f64,
    pub refresh: Refresh,
}

/// Monotonic simulation time plus wall-clock throttling.
///
/// The host calls [`SimulationClock::tick`] from its frame callback and
/// recomputes whenever a [`Frame`] comes back. Pausing is simply not calling
/// it, or turning animation off.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    time: f64,
    step: f64,
    animating: bool,
    min_interval: Duration,
    last_refresh: Option<Instant>,
    dirty: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP, DEFAULT_MIN_INTERVAL)
    }
}

impl SimulationClock {
    /// A fresh clock starts dirty so the first tick always produces a frame.
    pub fn new(step: f64, min_interval: Duration) -> Self {
        Self {
            time: 0.0,
            step: step.max(0.0),
            animating: true,
            min_interval,
            last_refresh: None,
            dirty: true,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Freezes or resumes simulation time.
    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    /// Requests one unthrottled recomputation on the next tick.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.last_refresh = None;
        self.dirty = true;
    }

    /// Advances the clock to the host's `now`.
    ///
    /// A pending configuration change yields an immediate frame regardless of
    /// throttling. Otherwise, while animating, a frame is produced at most
    /// once per `min_interval`. Every frame moves time by one step while
    /// animating.
    pub fn tick(&mut self, now: Instant) -> Option<Frame> {
        if self.dirty {
            self.dirty = false;
            return Some(self.advance(now, Refresh::Immediate));
        }

        if !self.animating {
            return None;
        }

        if let Some(last) = self.last_refresh {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_interval {
                tracing::trace!(?elapsed, "throttled recomputation");
                return None;
            }
        }

        Some(self.advance(now, Refresh::Scheduled))
    }

    fn advance(&mut self, now: Instant, refresh: Refresh) -> Frame {
        self.last_refresh = Some(now);
        if self.animating {
            self.time += self.step;
        }
        Frame {
            time: self.time,
            refresh,
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
    fn first_tick_is_immediate() {
        let mut clock = SimulationClock::default();
        let frame = clock.tick(Instant::now()).unwrap();
        assert_eq!(frame.refresh, Refresh::Immediate);
        assert!((frame.time - 0.05).abs() < 1e-12);
    }

    #[test]
    fn throttles_to_the_minimum_interval() {
        let start = Instant::now();
        let mut clock = SimulationClock::default();
        clock.tick(start);

        assert!(clock.tick(start + ms(16)).is_none());
        assert!(clock.tick(start + ms(33)).is_none());
        let frame = clock.tick(start + ms(50)).unwrap();
        assert_eq!(frame.refresh, Refresh::Scheduled);
        assert!((frame.time - 0.10).abs() < 1e-12);
        assert!(clock.tick(start + ms(66)).is_none());
        assert!(clock.tick(start + ms(100)).is_some());
        assert!((clock.time() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn configuration_changes_bypass_the_throttle_and_advance_time() {
        let start = Instant::now();
        let mut clock = SimulationClock::default();
        clock.tick(start);
        clock.tick(start + ms(50));
        assert!((clock.time() - 0.10).abs() < 1e-12);

        clock.mark_dirty();
        let frame = clock.tick(start + ms(51)).unwrap();
        assert_eq!(frame.refresh, Refresh::Immediate);
        assert!((frame.time - 0.15).abs() < 1e-12);
        assert!(clock.tick(start + ms(60)).is_none());
    }

    #[test]
    fn paused_clock_keeps_time_frozen() {
        let start = Instant::now();
        let mut clock = SimulationClock::default();
        clock.set_animating(false);
        assert_eq!(clock.tick(start).unwrap().time, 0.0);

        for i in 1..10 {
            assert!(clock.tick(start + ms(100 * i)).is_none());
        }
        assert_eq!(clock.time(), 0.0);

        // a configuration change still recomputes, at the frozen time
        clock.mark_dirty();
        let frame = clock.tick(start + ms(1_000)).unwrap();
        assert_eq!(frame.refresh, Refresh::Immediate);
        assert_eq!(frame.time, 0.0);
    }

    #[test]
    fn reset_rewinds_time() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(1.0, Duration::ZERO);
        clock.tick(start);
        clock.tick(start);
        clock.tick(start);
        assert_eq!(clock.time(), 3.0);

        clock.reset();
        assert_eq!(clock.time(), 0.0);
        let frame = clock.tick(start).unwrap();
        assert_eq!(frame.refresh, Refresh::Immediate);
        assert_eq!(frame.time, 1.0);
    }
}
