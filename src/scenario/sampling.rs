//! Throttled, bounded time-series buffers feeding the chart sink.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::engine::SimTime;

/// Chart-ready copy of one series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Time labels, seconds with two decimals.
    pub labels: Vec<String>,
    /// Sample values.
    pub values: Vec<f64>,
}

/// Bounded `(time, value)` sequence with oldest-first eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    times: VecDeque<SimTime>,
    values: VecDeque<f64>,
    capacity: usize,
}

impl SampleBuffer {
    /// Create an empty buffer. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            times: VecDeque::with_capacity(capacity),
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full.
    pub fn push(&mut self, time: SimTime, value: f64) {
        while self.values.len() >= self.capacity {
            self.times.pop_front();
            self.values.pop_front();
        }
        self.times.push_back(time);
        self.values.push_back(value);
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of samples.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.times.clear();
        self.values.clear();
    }

    /// Sample times, oldest first.
    pub fn times(&self) -> impl Iterator<Item = SimTime> + '_ {
        self.times.iter().copied()
    }

    /// Sample values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Time labels formatted to two decimals.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.times
            .iter()
            .map(|t| format!("{:.2}", t.as_secs_f64()))
            .collect()
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<(SimTime, f64)> {
        self.times.back().copied().zip(self.values.back().copied())
    }

    /// Copy out for a chart sink.
    #[must_use]
    pub fn to_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.labels(),
            values: self.values().collect(),
        }
    }
}

/// Records the height and velocity series at most once per interval of
/// simulated time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecorder {
    height: SampleBuffer,
    velocity: SampleBuffer,
    interval: SimTime,
    slack: SimTime,
    last_sample: Option<SimTime>,
}

impl SampleRecorder {
    /// Create a recorder with per-series `capacity` and minimum sample
    /// `interval` in seconds.
    #[must_use]
    pub fn new(capacity: usize, interval_secs: f64) -> Self {
        Self {
            height: SampleBuffer::new(capacity),
            velocity: SampleBuffer::new(capacity),
            interval: SimTime::from_secs(interval_secs),
            slack: SimTime::ZERO,
            last_sample: None,
        }
    }

    /// Accept samples up to half a timestep early. Elapsed time and the
    /// interval are rounded to nanoseconds separately, so a whole number
    /// of steps can land a nanosecond short of the interval.
    #[must_use]
    pub fn with_timestep(mut self, timestep_secs: f64) -> Self {
        self.slack = SimTime::from_secs(timestep_secs / 2.0);
        self
    }

    /// Append one sample to each series if at least one interval has
    /// passed since the previous sample. Returns whether it did.
    pub fn record(&mut self, now: SimTime, height: f64, velocity: f64) -> bool {
        let due = self.last_sample.map_or(true, |last| {
            now.since(last).as_nanos() + self.slack.as_nanos() >= self.interval.as_nanos()
        });
        if due {
            self.height.push(now, height);
            self.velocity.push(now, velocity);
            self.last_sample = Some(now);
        }
        due
    }

    /// Empty both series and forget the last sample time.
    pub fn clear(&mut self) {
        self.height.clear();
        self.velocity.clear();
        self.last_sample = None;
    }

    /// Height series (m).
    #[must_use]
    pub const fn height(&self) -> &SampleBuffer {
        &self.height
    }

    /// Velocity series (m/s).
    #[must_use]
    pub const fn velocity(&self) -> &SampleBuffer {
        &self.velocity
    }

    /// Whether both series are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height.is_empty() && self.velocity.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_evicts_oldest_first() {
        let mut buffer = SampleBuffer::new(3);
        for i in 0..5u32 {
            buffer.push(SimTime::from_secs(f64::from(i)), f64::from(i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.values().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.labels(), vec!["2.00", "3.00", "4.00"]);
        assert_eq!(buffer.latest(), Some((SimTime::from_secs(4.0), 4.0)));
    }

    #[test]
    fn test_buffer_zero_capacity_raised() {
        let mut buffer = SampleBuffer::new(0);
        buffer.push(SimTime::ZERO, 1.0);
        buffer.push(SimTime::from_secs(1.0), 2.0);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.values().collect::<Vec<_>>(), vec![2.0]);
    }

    #[test]
    fn test_buffer_series_copy() {
        let mut buffer = SampleBuffer::new(10);
        buffer.push(SimTime::from_secs(1.0 / 60.0), 5.8);
        let series = buffer.to_series();
        assert_eq!(series.labels, vec!["0.02"]);
        assert_eq!(series.values, vec![5.8]);
    }

    #[test]
    fn test_recorder_rate_limited() {
        let mut recorder = SampleRecorder::new(150, 0.02);
        let step = 10_000_000;

        let recorded = (1..=120u64)
            .filter(|n| recorder.record(SimTime::from_nanos(n * step), 1.0, 1.0))
            .count();

        assert_eq!(recorded, 60);
        assert_eq!(recorder.height().len(), 60);
        assert_eq!(recorder.velocity().len(), 60);
    }

    #[test]
    fn test_recorder_every_frame_at_matching_rate() {
        let mut recorder = SampleRecorder::new(150, 1.0 / 60.0);
        let step = SimTime::from_secs(1.0 / 60.0).as_nanos();
        for n in 1..=30u64 {
            assert!(recorder.record(SimTime::from_nanos(n * step), 0.0, 0.0));
        }
    }

    #[test]
    fn test_recorder_whole_steps_per_interval() {
        let dt = 1.0 / 120.0;
        let mut recorder = SampleRecorder::new(150, 1.0 / 60.0).with_timestep(dt);
        let step = SimTime::from_secs(dt).as_nanos();

        let recorded = (1..=120u64)
            .filter(|n| recorder.record(SimTime::from_nanos(n * step), 0.0, 0.0))
            .count();

        assert_eq!(recorded, 60);
    }

    #[test]
    fn test_recorder_slack_never_samples_every_step() {
        let dt = 1.0 / 240.0;
        let mut recorder = SampleRecorder::new(150, 1.0 / 60.0).with_timestep(dt);
        let step = SimTime::from_secs(dt).as_nanos();

        let recorded: Vec<u64> = (1..=16u64)
            .filter(|n| recorder.record(SimTime::from_nanos(n * step), 0.0, 0.0))
            .collect();

        assert_eq!(recorded, vec![1, 5, 9, 13]);
    }

    #[test]
    fn test_recorder_clear() {
        let mut recorder = SampleRecorder::new(4, 0.0);
        recorder.record(SimTime::from_secs(0.5), 1.0, 2.0);
        assert!(!recorder.is_empty());
        recorder.clear();
        assert!(recorder.is_empty());
        assert!(recorder.record(SimTime::ZERO, 0.0, 0.0));
    }
}
