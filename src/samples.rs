use std::collections::VecDeque;
use std::time::Duration;

use crate::metrics;

/// Most samples kept for the results graph.
pub const SAMPLE_CAPACITY: usize = 120;
/// Zero entries a fresh session starts with so an early graph has a baseline.
pub const BASELINE_SAMPLES: usize = 3;
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Bounded history of per-interval wpm readings, oldest evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleHistory {
    samples: VecDeque<u32>,
    capacity: usize,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// History pre-filled with [`BASELINE_SAMPLES`] zeros.
    pub fn with_baseline() -> Self {
        let mut history = Self::new(SAMPLE_CAPACITY);
        for _ in 0..BASELINE_SAMPLES {
            history.push(0);
        }
        history
    }

    pub fn push(&mut self, wpm: u32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(wpm);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    pub fn consistency(&self) -> u32 {
        let values: Vec<f64> = self.iter().map(f64::from).collect();
        metrics::consistency(&values)
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::with_baseline()
    }
}

/// Fixed-interval sampling schedule anchored at the session start.
///
/// The schedule is polled with clock readings instead of running its own
/// timer: every poll reports each interval boundary passed since the last
/// one, so no boundary is skipped when polls arrive late or in bursts.
#[derive(Debug, Clone)]
pub struct Sampler {
    interval: Duration,
    next_due: Option<Duration>,
}

impl Sampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn start(&mut self, started_at: Duration) {
        self.next_due = Some(started_at + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Boundaries at or before `now`, oldest first. Advances past them.
    pub fn due(&mut self, now: Duration) -> Vec<Duration> {
        let mut due = Vec::new();
        if let Some(mut next) = self.next_due {
            while next <= now {
                due.push(next);
                next += self.interval;
            }
            self.next_due = Some(next);
        }
        due
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(SAMPLE_INTERVAL)
    }
}
