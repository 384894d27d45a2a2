//! Simulated-time bookkeeping.
//!
//! Elapsed time is kept as integer nanoseconds so that rate limiting and
//! chart labels do not drift from accumulated floating-point error.

use serde::{Deserialize, Serialize};

/// Simulation time in nanoseconds from the start of a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    /// Zero time (run start).
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create time from seconds. Negative and non-finite inputs map to zero.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = (secs * 1_000_000_000.0).round() as u64;
        Self { nanos }
    }

    /// Create time from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Time as seconds.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Time as nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Difference to an earlier time, saturating at zero.
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self {
            nanos: self.nanos.saturating_sub(earlier.nanos),
        }
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}s", self.as_secs_f64())
    }
}

/// Accumulates simulated time for the current run.
///
/// Only advanced by running ticks, so pausing and resuming never counts
/// the same interval twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunClock {
    elapsed: SimTime,
    timestep_nanos: u64,
    step_count: u64,
}

impl RunClock {
    /// Create a clock with a fixed timestep in seconds.
    #[must_use]
    pub fn new(timestep_secs: f64) -> Self {
        Self {
            elapsed: SimTime::ZERO,
            timestep_nanos: SimTime::from_secs(timestep_secs).as_nanos(),
            step_count: 0,
        }
    }

    /// Elapsed simulated time.
    #[must_use]
    pub const fn elapsed(&self) -> SimTime {
        self.elapsed
    }

    /// Number of running ticks since the last reset.
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Advance by one timestep and return the new time.
    pub fn tick(&mut self) -> SimTime {
        self.step_count += 1;
        self.elapsed = SimTime::from_nanos(self.step_count * self.timestep_nanos);
        self.elapsed
    }

    /// Back to zero.
    pub fn reset(&mut self) {
        self.elapsed = SimTime::ZERO;
        self.step_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_conversions() {
        let t = SimTime::from_secs(1.5);
        assert_eq!(t.as_nanos(), 1_500_000_000);
        assert!((t.as_secs_f64() - 1.5).abs() < 1e-12);
        assert_eq!(SimTime::from_secs(-1.0), SimTime::ZERO);
        assert_eq!(SimTime::from_secs(f64::NAN), SimTime::ZERO);
    }

    #[test]
    fn test_sim_time_since_saturates() {
        let a = SimTime::from_nanos(10);
        let b = SimTime::from_nanos(30);
        assert_eq!(b.since(a).as_nanos(), 20);
        assert_eq!(a.since(b), SimTime::ZERO);
    }

    #[test]
    fn test_sim_time_display() {
        assert_eq!(SimTime::from_secs(1.414).to_string(), "1.41s");
    }

    #[test]
    fn test_run_clock_tick_and_reset() {
        let mut clock = RunClock::new(1.0 / 60.0);
        for _ in 0..60 {
            clock.tick();
        }
        assert_eq!(clock.step_count(), 60);
        assert!((clock.elapsed().as_secs_f64() - 1.0).abs() < 1e-6);

        clock.reset();
        assert_eq!(clock.elapsed(), SimTime::ZERO);
        assert_eq!(clock.step_count(), 0);
    }
}
