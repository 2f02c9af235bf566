//! Turns the coordination server's loosely-typed test records into sorted
//! [`TestSummary`] rows.
//!
//! Records come straight from the server's "active tests" endpoint, keyed by
//! test id. Any field may be missing or carry an unexpected type; each one
//! degrades to its default (`0`, `None`, `"N/A"`) instead of rejecting the
//! record.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::model::TestSummary;

pub const MISSING_LABEL: &str = "N/A";

/// Raw server payload: test id → record.
pub type RawTests = Map<String, Value>;

/// Build the sorted summary list for one cycle.
pub fn process(raw: &RawTests) -> Vec<TestSummary> {
    let mut summaries: Vec<TestSummary> = raw
        .iter()
        .map(|(id, record)| summarize(id, record))
        .collect();
    sort_by_llr(&mut summaries);
    summaries
}

/// Normalize a single record.
pub fn summarize(id: &str, record: &Value) -> TestSummary {
    let username = label(record.pointer("/args/username"));
    let branch_name = label(record.pointer("/args/new_tag"));
    let llr = record.pointer("/args/sprt/llr").and_then(coerce_f64);
    let wins = count(record.pointer("/results/wins"));
    let losses = count(record.pointer("/results/losses"));
    let draws = count(record.pointer("/results/draws"));
    let worker_count = count(record.get("workers"));
    let sprt_reference_elo0 = record.pointer("/args/sprt/elo0").and_then(coerce_f64);

    TestSummary {
        id: id.to_string(),
        username,
        branch_name,
        llr,
        wins_minus_losses: (wins as i64).saturating_sub(losses as i64),
        wins,
        losses,
        draws,
        total_games: wins.saturating_add(losses).saturating_add(draws),
        worker_count,
        sprt_reference_elo0,
    }
}

/// Descending by llr; tests without one go last. The sort is stable, so
/// equal keys keep their input order.
pub fn sort_by_llr(summaries: &mut [TestSummary]) {
    summaries.sort_by(|a, b| compare_llr_desc(a.llr, b.llr));
}

fn compare_llr_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => MISSING_LABEL.to_string(),
    }
}

fn count(value: Option<&Value>) -> u64 {
    value
        .and_then(coerce_i64)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

/// Integer coercion: JSON integers, finite floats (truncated) and strings
/// with a leading integer (`"12"`, `" 12 "`, `"12abc"`).
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(text) => leading_integer(text.trim()),
        _ => None,
    }
}

/// Float coercion: JSON numbers and numeric strings. Non-finite results are
/// treated as absent.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn leading_integer(text: &str) -> Option<i64> {
    let sign_len = usize::from(text.starts_with(['-', '+']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}
