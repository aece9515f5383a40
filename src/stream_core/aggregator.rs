//! Rolling aggregate state: bounded score series plus cumulative counters

use super::event::Event;
use super::scorer::ScoreResult;
use super::window::{PairedWindow, SeriesPoint};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Insertion-ordered counter. Ranking uses a stable sort so equal counts keep
/// the order in which their keys were first seen.
#[derive(Debug, Clone, Default)]
struct CountTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CountTable {
    fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn get(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn ranked(&self) -> Vec<TermCount> {
        let mut ranked: Vec<TermCount> = self
            .entries
            .iter()
            .map(|(term, count)| TermCount {
                term: term.clone(),
                count: *count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub event_count: u64,
    pub high_impact_count: u64,
    pub opportunity_count: u64,
    pub significant_count: u64,
    pub skipped_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Percentages of `event_count`, all zero before the first event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rates {
    pub significant_pct: f64,
    pub high_impact_pct: f64,
    pub opportunity_pct: f64,
}

impl Rates {
    fn from_totals(totals: &Totals) -> Self {
        if totals.event_count == 0 {
            return Self::default();
        }
        let total = totals.event_count as f64;
        Self {
            significant_pct: totals.significant_count as f64 / total * 100.0,
            high_impact_pct: totals.high_impact_count as f64 / total * 100.0,
            opportunity_pct: totals.opportunity_count as f64 / total * 100.0,
        }
    }
}

/// Read-only point-in-time copy of the aggregate state, handed to presenters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub window_capacity: usize,
    pub content_series: Vec<SeriesPoint>,
    pub impact_series: Vec<SeriesPoint>,
    pub keyword_counts: Vec<TermCount>,
    pub category_counts: Vec<TermCount>,
    pub contributor_count: usize,
    pub totals: Totals,
    pub rates: Rates,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn top_keywords(&self, n: usize) -> &[TermCount] {
        &self.keyword_counts[..n.min(self.keyword_counts.len())]
    }
}

/// The mutable core entity. Mutated only through [`RollingAggregator::update`]
/// and [`RollingAggregator::record_skipped`].
#[derive(Debug, Clone)]
pub struct RollingAggregator {
    window: PairedWindow,
    keyword_counts: CountTable,
    category_counts: CountTable,
    contributors: HashSet<String>,
    totals: Totals,
}

impl RollingAggregator {
    pub fn new(window_capacity: usize) -> Self {
        Self {
            window: PairedWindow::new(window_capacity),
            keyword_counts: CountTable::default(),
            category_counts: CountTable::default(),
            contributors: HashSet::new(),
            totals: Totals::default(),
        }
    }

    /// Fold one scored event into the state.
    pub fn update(&mut self, event: &Event, result: &ScoreResult) {
        self.window
            .push(event.timestamp, result.content_score, result.impact_score);

        for term in &result.matched_terms {
            self.keyword_counts.increment(term);
        }

        if !self.contributors.contains(&event.author) {
            self.contributors.insert(event.author.clone());
        }

        self.totals.event_count += 1;
        if result.is_high_impact {
            self.totals.high_impact_count += 1;
        }
        if result.is_opportunity {
            self.totals.opportunity_count += 1;
        }
        if result.is_significant {
            self.totals.significant_count += 1;
            self.category_counts.increment(&event.declared_category);
        }
    }

    /// Count a record that failed validation. Nothing else is touched.
    pub fn record_skipped(&mut self) {
        self.totals.skipped_count += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            window_capacity: self.window.capacity(),
            content_series: self.window.content().iter().copied().collect(),
            impact_series: self.window.impact().iter().copied().collect(),
            keyword_counts: self.keyword_counts.ranked(),
            category_counts: self.category_counts.ranked(),
            contributor_count: self.contributors.len(),
            totals: self.totals,
            rates: Rates::from_totals(&self.totals),
            last_event_at: self.window.latest().map(|(content, _)| content.timestamp),
        }
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn window(&self) -> &PairedWindow {
        &self.window
    }

    pub fn keyword_count(&self, term: &str) -> u64 {
        self.keyword_counts.get(term)
    }

    pub fn distinct_keywords(&self) -> usize {
        self.keyword_counts.len()
    }

    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }

    pub fn has_contributor(&self, author: &str) -> bool {
        self.contributors.contains(author)
    }
}
