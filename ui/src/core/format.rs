//! Formatting helpers for presenting test metrics.

use super::model::TestSummary;

/// SPRT decision boundary for the default (0.05, 0.05) error bounds:
/// `ln((1 - beta) / alpha)`.
pub const LLR_BOUND: f64 = 2.94443897916644;

pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Share of points scored, in percent. Zero games count as 0%.
pub fn score_percent(wins: u64, losses: u64, draws: u64) -> f64 {
    let (wins, losses, draws) = (wins as f64, losses as f64, draws as f64);
    let score = (wins + draws / 2.0) / (wins + losses + draws) * 100.0;
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Progress toward the acceptance (+100) or rejection (-100) bound.
pub fn llr_progress_percent(llr: f64) -> i64 {
    let pct = (llr / LLR_BOUND * 100.0).clamp(-100.0, 100.0);
    round_half_up(pct) as i64
}

/// `"2.94 (100%)"`, or `"N/A"` without an llr.
pub fn llr_display(llr: Option<f64>) -> String {
    match llr {
        Some(llr) => format!("{llr:.2} ({}%)", llr_progress_percent(llr)),
        None => "N/A".to_string(),
    }
}

/// `"600 (51.67%)"`.
pub fn games_display(summary: &TestSummary) -> String {
    let score = score_percent(summary.wins, summary.losses, summary.draws);
    format!("{} ({}%)", summary.total_games, format_number(score, 2))
}

/// Halves round toward positive infinity, so -0.5 becomes 0.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
