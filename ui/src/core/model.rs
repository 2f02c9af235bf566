//! Data shapes persisted by the fetch command and read back by the page.

use serde::{Deserialize, Serialize};

/// One active test as shown in the table.
///
/// Field names follow the snapshot file format (`branch`, `wml`, `workers`,
/// `sprtElo0`), so a summary serializes straight into `tests.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub id: String,
    pub username: String,
    #[serde(rename = "branch")]
    pub branch_name: String,
    /// `None` until the test has a sequential statistic.
    pub llr: Option<f64>,
    #[serde(rename = "wml")]
    pub wins_minus_losses: i64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total_games: u64,
    #[serde(rename = "workers")]
    pub worker_count: u64,
    #[serde(rename = "sprtElo0")]
    pub sprt_reference_elo0: Option<f64>,
}

/// How a test is tinted, derived from the sign of its SPRT `elo0` bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestClass {
    Regression,
    Improvement,
}

impl TestSummary {
    pub fn is_paused(&self) -> bool {
        self.worker_count == 0
    }

    /// Zero counts as non-negative.
    pub fn classification(&self) -> Option<TestClass> {
        self.sprt_reference_elo0.map(|elo0| {
            if elo0 < 0.0 {
                TestClass::Regression
            } else {
                TestClass::Improvement
            }
        })
    }
}

/// One retained sample of a test's progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Unix seconds.
    #[serde(rename = "time")]
    pub timestamp_seconds: i64,
    #[serde(rename = "wml")]
    pub wins_minus_losses: i64,
    pub llr: Option<f64>,
}

impl HistoryPoint {
    /// True when the two samples carry the same measurements, ignoring time.
    pub fn same_reading(&self, other: &HistoryPoint) -> bool {
        self.wins_minus_losses == other.wins_minus_losses && self.llr == other.llr
    }
}
