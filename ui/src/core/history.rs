//! Bounded per-test progress history.
//!
//! Each cycle of the fetch command feeds the fresh summaries through
//! [`HistoryStore::record_cycle`]. A test gains at most one point per cycle,
//! and only when its wml or llr moved since the last retained point. Tests
//! that dropped out of the active list lose their history.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::model::{HistoryPoint, TestSummary};

/// Retained samples per test (three days at one sample per five minutes).
pub const MAX_HISTORY_POINTS: usize = 864;

/// Test id → samples, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryStore {
    tests: BTreeMap<String, VecDeque<HistoryPoint>>,
}

/// What one call to [`HistoryStore::record_cycle`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub points_added: usize,
    pub points_evicted: usize,
    pub tests_pruned: usize,
}

impl CycleOutcome {
    /// Whether the store differs from before the cycle and needs saving.
    pub fn changed(&self) -> bool {
        self.points_added > 0 || self.points_evicted > 0 || self.tests_pruned > 0
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle's summaries into the store.
    pub fn record_cycle(&mut self, summaries: &[TestSummary], now_seconds: i64) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();

        for summary in summaries {
            let points = self.tests.entry(summary.id.clone()).or_default();
            let candidate = HistoryPoint {
                timestamp_seconds: now_seconds,
                wins_minus_losses: summary.wins_minus_losses,
                llr: summary.llr,
            };

            let moved = points
                .back()
                .map_or(true, |last| !last.same_reading(&candidate));
            if moved {
                points.push_back(candidate);
                outcome.points_added += 1;
            }

            while points.len() > MAX_HISTORY_POINTS {
                points.pop_front();
                outcome.points_evicted += 1;
            }
        }

        let active: HashSet<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        let before = self.tests.len();
        self.tests.retain(|id, _| active.contains(id.as_str()));
        outcome.tests_pruned = before - self.tests.len();

        outcome
    }

    /// Samples for one test, oldest first.
    pub fn points(&self, id: &str) -> Option<&VecDeque<HistoryPoint>> {
        self.tests.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tests.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Most recent capture time across every test.
    pub fn latest_timestamp(&self) -> Option<i64> {
        self.tests
            .values()
            .filter_map(|points| points.back())
            .map(|point| point.timestamp_seconds)
            .max()
    }
}

impl FromIterator<(String, Vec<HistoryPoint>)> for HistoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Vec<HistoryPoint>)>>(iter: I) -> Self {
        Self {
            tests: iter
                .into_iter()
                .map(|(id, points)| (id, VecDeque::from(points)))
                .collect(),
        }
    }
}
