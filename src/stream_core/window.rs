//! Fixed-capacity rolling windows for score series

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_WINDOW_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Content and impact series that always grow and evict together, so their
/// lengths never diverge.
#[derive(Debug, Clone)]
pub struct PairedWindow {
    capacity: usize,
    content: VecDeque<SeriesPoint>,
    impact: VecDeque<SeriesPoint>,
}

impl PairedWindow {
    /// A zero capacity is bumped to 1; the config layer rejects it earlier.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            content: VecDeque::with_capacity(capacity),
            impact: VecDeque::with_capacity(capacity),
        }
    }

    /// Append one pair, evicting the oldest pair when over capacity.
    /// Returns the evicted timestamp, if any.
    pub fn push(
        &mut self,
        timestamp: DateTime<Utc>,
        content_score: f64,
        impact_score: f64,
    ) -> Option<DateTime<Utc>> {
        self.content.push_back(SeriesPoint {
            timestamp,
            value: content_score,
        });
        self.impact.push_back(SeriesPoint {
            timestamp,
            value: impact_score,
        });

        if self.content.len() > self.capacity {
            let evicted = self.content.pop_front().map(|p| p.timestamp);
            self.impact.pop_front();
            return evicted;
        }
        None
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn content(&self) -> &VecDeque<SeriesPoint> {
        &self.content
    }

    pub fn impact(&self) -> &VecDeque<SeriesPoint> {
        &self.impact
    }

    pub fn latest(&self) -> Option<(SeriesPoint, SeriesPoint)> {
        Some((*self.content.back()?, *self.impact.back()?))
    }
}
