//! Per-test progress chart: which test is tracked, which metric is shown,
//! and the SVG drawing of both series.

use std::collections::VecDeque;

use dioxus::prelude::*;

use crate::{
    core::{
        format,
        history::HistoryStore,
        model::{HistoryPoint, TestSummary},
        timing,
    },
    results::DashboardState,
    t,
};

/// The llr axis is pinned to ±3, just past the ±2.94 decision bounds.
pub const LLR_AXIS_LIMIT: f64 = 3.0;

/// DOM id of the chart panel, used as the scroll target.
pub const CHART_ANCHOR: &str = "progress-chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMetric {
    /// Wins minus losses.
    Score,
    #[default]
    Llr,
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesPoint {
    pub time_ms: i64,
    /// NaN marks a gap.
    pub value: f64,
}

/// Bitwise on the value, so two gaps compare equal.
impl PartialEq for SeriesPoint {
    fn eq(&self, other: &Self) -> bool {
        self.time_ms == other.time_ms && self.value.to_bits() == other.value.to_bits()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub score: Vec<SeriesPoint>,
    pub llr: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn from_history(points: Option<&VecDeque<HistoryPoint>>) -> Self {
        let Some(points) = points else {
            return Self::default();
        };
        let score = points
            .iter()
            .map(|point| SeriesPoint {
                time_ms: point.timestamp_seconds.saturating_mul(1000),
                value: point.wins_minus_losses as f64,
            })
            .collect();
        let llr = points
            .iter()
            .map(|point| SeriesPoint {
                time_ms: point.timestamp_seconds.saturating_mul(1000),
                value: point.llr.unwrap_or(f64::NAN),
            })
            .collect();
        Self { score, llr }
    }

    pub fn get(&self, metric: ChartMetric) -> &[SeriesPoint] {
        match metric {
            ChartMetric::Score => &self.score,
            ChartMetric::Llr => &self.llr,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedTest {
    pub id: String,
    pub branch_name: String,
    /// The test is no longer in the active list.
    pub ended: bool,
    pub series: ChartSeries,
}

/// Value-axis configuration for the visible metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub begin_at_zero: bool,
}

impl AxisRange {
    pub fn for_metric(metric: ChartMetric) -> Self {
        match metric {
            ChartMetric::Llr => Self {
                min: Some(-LLR_AXIS_LIMIT),
                max: Some(LLR_AXIS_LIMIT),
                begin_at_zero: false,
            },
            ChartMetric::Score => Self {
                min: None,
                max: None,
                begin_at_zero: true,
            },
        }
    }

    /// Concrete bounds for `points`; unbounded sides follow the data.
    pub fn resolve(&self, points: &[SeriesPoint]) -> (f64, f64) {
        let finite = points.iter().map(|p| p.value).filter(|v| v.is_finite());
        let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if self.begin_at_zero || !lo.is_finite() {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }
        let mut lo = self.min.unwrap_or(lo);
        let mut hi = self.max.unwrap_or(hi);
        if hi - lo < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }
        (lo, hi)
    }
}

/// Outcome of a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Already tracked; only focus the chart.
    Unchanged,
    Replaced,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartState {
    tracked: Option<TrackedTest>,
    metric: ChartMetric,
}

impl ChartState {
    pub fn tracked(&self) -> Option<&TrackedTest> {
        self.tracked.as_ref()
    }

    pub fn metric(&self) -> ChartMetric {
        self.metric
    }

    pub fn select_test(
        &mut self,
        id: &str,
        branch_name: &str,
        history: &HistoryStore,
        summaries: &[TestSummary],
    ) -> Selection {
        if self.tracked.as_ref().is_some_and(|t| t.id == id) {
            return Selection::Unchanged;
        }
        self.metric = ChartMetric::Llr;
        self.tracked = Some(TrackedTest {
            id: id.to_string(),
            branch_name: branch_name.to_string(),
            ended: !is_active(id, summaries),
            series: ChartSeries::from_history(history.points(id)),
        });
        Selection::Replaced
    }

    pub fn toggle_metric(&mut self, metric: ChartMetric) {
        self.metric = metric;
    }

    /// Rebuild the tracked test's series from freshly loaded data.
    pub fn refresh(&mut self, history: &HistoryStore, summaries: &[TestSummary]) {
        if let Some(tracked) = self.tracked.as_mut() {
            tracked.series = ChartSeries::from_history(history.points(&tracked.id));
            tracked.ended = !is_active(&tracked.id, summaries);
        }
    }

    pub fn is_visible(&self, metric: ChartMetric) -> bool {
        self.metric == metric
    }

    pub fn axis(&self) -> AxisRange {
        AxisRange::for_metric(self.metric)
    }
}

fn is_active(id: &str, summaries: &[TestSummary]) -> bool {
    summaries.iter().any(|summary| summary.id == id)
}

const VIEW_WIDTH: f64 = 800.0;
const VIEW_HEIGHT: f64 = 320.0;
const PAD_LEFT: f64 = 48.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_Y: f64 = 16.0;

/// Maps (time, value) into SVG coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub time: (i64, i64),
    pub value: (f64, f64),
}

impl ChartFrame {
    pub fn new(series: &ChartSeries, metric: ChartMetric) -> Self {
        let times = series.score.iter().map(|p| p.time_ms);
        let time = match (times.clone().min(), times.max()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0, 0),
        };
        let value = AxisRange::for_metric(metric).resolve(series.get(metric));
        Self { time, value }
    }

    pub fn project(&self, point: SeriesPoint) -> (f64, f64) {
        let plot_w = VIEW_WIDTH - PAD_LEFT - PAD_RIGHT;
        let plot_h = VIEW_HEIGHT - 2.0 * PAD_Y;
        let span = (self.time.1 - self.time.0) as f64;
        let x = if span > 0.0 {
            PAD_LEFT + (point.time_ms - self.time.0) as f64 / span * plot_w
        } else {
            PAD_LEFT + plot_w / 2.0
        };
        let (lo, hi) = self.value;
        let clamped = point.value.clamp(lo, hi);
        let y = PAD_Y + (hi - clamped) / (hi - lo) * plot_h;
        (x, y)
    }

    pub fn y_for(&self, value: f64) -> f64 {
        self.project(SeriesPoint {
            time_ms: self.time.0,
            value,
        })
        .1
    }
}

/// SVG path data; every NaN lifts the pen so the line breaks there.
pub fn series_path(points: &[SeriesPoint], frame: &ChartFrame) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for point in points {
        if !point.value.is_finite() {
            pen_down = false;
            continue;
        }
        let (x, y) = frame.project(*point);
        if !path.is_empty() {
            path.push(' ');
        }
        path.push_str(&format!("{} {x:.1} {y:.1}", if pen_down { "L" } else { "M" }));
        pen_down = true;
    }
    path
}

pub fn scroll_to_chart() {
    let _ = document::eval(&format!(
        "document.getElementById('{CHART_ANCHOR}')?.scrollIntoView({{ behavior: 'smooth' }});"
    ));
}

#[component]
pub fn ProgressChart(mut state: Signal<DashboardState>) -> Element {
    let snapshot = state.read();
    let chart = &snapshot.chart;

    let Some(tracked) = chart.tracked() else {
        return rsx! {
            section { id: CHART_ANCHOR, class: "results-card progress-chart",
                p { class: "results-card__placeholder", {t!("chart-placeholder")} }
            }
        };
    };

    let metric = chart.metric();
    let score_frame = ChartFrame::new(&tracked.series, ChartMetric::Score);
    let llr_frame = ChartFrame::new(&tracked.series, ChartMetric::Llr);
    let score_path = series_path(&tracked.series.score, &score_frame);
    let llr_path = series_path(&tracked.series.llr, &llr_frame);
    let active_frame = match metric {
        ChartMetric::Score => score_frame,
        ChartMetric::Llr => llr_frame,
    };
    let (lo, hi) = active_frame.value;
    let zero_y = active_frame.y_for(0.0);
    let top_label = format::format_number(hi, if metric == ChartMetric::Llr { 1 } else { 0 });
    let bottom_label = format::format_number(lo, if metric == ChartMetric::Llr { 1 } else { 0 });
    let (first_ms, last_ms) = active_frame.time;
    let first_label = timing::format_utc(first_ms / 1000);
    let last_label = timing::format_utc(last_ms / 1000);
    let score_visibility = if chart.is_visible(ChartMetric::Score) { "visible" } else { "hidden" };
    let llr_visibility = if chart.is_visible(ChartMetric::Llr) { "visible" } else { "hidden" };
    let has_points = !tracked.series.is_empty();
    let ended = tracked.ended;
    let branch = tracked.branch_name.clone();
    let view_box = format!("0 0 {VIEW_WIDTH} {VIEW_HEIGHT}");
    let x0 = PAD_LEFT;
    let x1 = VIEW_WIDTH - PAD_RIGHT;
    let label_x = PAD_LEFT - 6.0;
    let top_y = PAD_Y + 4.0;
    let bottom_y = VIEW_HEIGHT - PAD_Y;
    let time_y = VIEW_HEIGHT - 2.0;
    drop(snapshot);

    let toggle_class = move |candidate: ChartMetric| {
        if metric == candidate {
            "progress-chart__toggle progress-chart__toggle--active"
        } else {
            "progress-chart__toggle"
        }
    };

    rsx! {
        section { id: CHART_ANCHOR, class: "results-card progress-chart",
            div { class: "results-card__header",
                h2 { {t!("chart-title", branch = branch)} }
                div { class: "progress-chart__toggles",
                    button {
                        r#type: "button",
                        class: toggle_class(ChartMetric::Llr),
                        onclick: move |_| {
                            state.write().on_metric_toggled(ChartMetric::Llr);
                        },
                        {t!("chart-metric-llr")}
                    }
                    button {
                        r#type: "button",
                        class: toggle_class(ChartMetric::Score),
                        onclick: move |_| {
                            state.write().on_metric_toggled(ChartMetric::Score);
                        },
                        {t!("chart-metric-score")}
                    }
                }
            }

            if ended {
                p { class: "progress-chart__banner", {t!("chart-ended")} }
            }

            if has_points {
                svg {
                    class: "progress-chart__canvas",
                    view_box: "{view_box}",
                    preserve_aspect_ratio: "none",
                    line { class: "progress-chart__zero", x1: "{x0}", x2: "{x1}", y1: "{zero_y}", y2: "{zero_y}" }
                    text { class: "progress-chart__tick", x: "{label_x}", y: "{top_y}", text_anchor: "end", "{top_label}" }
                    text { class: "progress-chart__tick", x: "{label_x}", y: "{bottom_y}", text_anchor: "end", "{bottom_label}" }
                    text { class: "progress-chart__tick", x: "{x0}", y: "{time_y}", text_anchor: "start", "{first_label}" }
                    text { class: "progress-chart__tick", x: "{x1}", y: "{time_y}", text_anchor: "end", "{last_label}" }
                    path { class: "progress-chart__series progress-chart__series--score", d: "{score_path}", visibility: score_visibility }
                    path { class: "progress-chart__series progress-chart__series--llr", d: "{llr_path}", visibility: llr_visibility }
                }
            } else {
                p { class: "results-card__placeholder", {t!("chart-no-history")} }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::MISSING_LABEL;

    fn summary(id: &str) -> TestSummary {
        TestSummary {
            id: id.into(),
            username: MISSING_LABEL.into(),
            branch_name: MISSING_LABEL.into(),
            llr: None,
            wins_minus_losses: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            total_games: 0,
            worker_count: 1,
            sprt_reference_elo0: None,
        }
    }

    fn point(time: i64, wml: i64, llr: Option<f64>) -> HistoryPoint {
        HistoryPoint {
            timestamp_seconds: time,
            wins_minus_losses: wml,
            llr,
        }
    }

    fn history() -> HistoryStore {
        [
            (
                "a".to_string(),
                vec![point(100, 1, None), point(400, 3, Some(0.5)), point(700, 2, Some(0.4))],
            ),
            ("gone".to_string(), vec![point(100, -1, Some(-0.2))]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn series_use_milliseconds_and_nan_for_missing_llr() {
        let store = history();
        let series = ChartSeries::from_history(store.points("a"));
        assert_eq!(series.score[1], SeriesPoint { time_ms: 400_000, value: 3.0 });
        assert!(series.llr[0].value.is_nan());
        assert_eq!(series.llr[2].value, 0.4);
    }

    #[test]
    fn selecting_builds_series_and_resets_metric() {
        let store = history();
        let mut chart = ChartState::default();
        chart.toggle_metric(ChartMetric::Score);

        let outcome = chart.select_test("a", "tweak", &store, &[summary("a")]);
        assert_eq!(outcome, Selection::Replaced);
        assert_eq!(chart.metric(), ChartMetric::Llr);
        let tracked = chart.tracked().unwrap();
        assert_eq!(tracked.branch_name, "tweak");
        assert!(!tracked.ended);
        assert_eq!(tracked.series.score.len(), 3);
    }

    #[test]
    fn reselecting_same_test_changes_nothing() {
        let store = history();
        let mut chart = ChartState::default();
        chart.select_test("a", "tweak", &store, &[summary("a")]);
        chart.toggle_metric(ChartMetric::Score);
        let before = chart.clone();

        let outcome = chart.select_test("a", "tweak", &store, &[summary("a")]);
        assert_eq!(outcome, Selection::Unchanged);
        assert_eq!(chart, before);
    }

    #[test]
    fn gap_points_compare_equal_to_themselves() {
        let gap = SeriesPoint {
            time_ms: 1_000,
            value: f64::NAN,
        };
        assert_eq!(gap, gap);
        assert_ne!(
            gap,
            SeriesPoint {
                time_ms: 1_000,
                value: 0.0,
            }
        );
    }

    #[test]
    fn out_of_range_timestamps_saturate() {
        let points: VecDeque<HistoryPoint> = [HistoryPoint {
            timestamp_seconds: i64::MAX,
            wins_minus_losses: 1,
            llr: None,
        }]
        .into_iter()
        .collect();
        let series = ChartSeries::from_history(Some(&points));
        assert_eq!(series.score[0].time_ms, i64::MAX);
        assert_eq!(series.llr[0].time_ms, i64::MAX);
    }

    #[test]
    fn test_missing_from_summaries_is_ended() {
        let store = history();
        let mut chart = ChartState::default();
        chart.select_test("gone", "old", &store, &[summary("a")]);
        assert!(chart.tracked().unwrap().ended);
    }

    #[test]
    fn unknown_test_gets_empty_series() {
        let mut chart = ChartState::default();
        chart.select_test("nope", "b", &HistoryStore::new(), &[]);
        assert!(chart.tracked().unwrap().series.is_empty());
    }

    #[test]
    fn toggling_to_score_swaps_visibility_and_unpins_axis() {
        let mut chart = ChartState::default();
        chart.select_test("a", "tweak", &history(), &[summary("a")]);
        assert!(chart.is_visible(ChartMetric::Llr));
        assert_eq!(chart.axis().min, Some(-3.0));
        assert_eq!(chart.axis().max, Some(3.0));

        chart.toggle_metric(ChartMetric::Score);
        assert!(chart.is_visible(ChartMetric::Score));
        assert!(!chart.is_visible(ChartMetric::Llr));
        assert_eq!(chart.axis().min, None);
        assert_eq!(chart.axis().max, None);
        assert!(chart.axis().begin_at_zero);
    }

    #[test]
    fn refresh_rebuilds_tracked_series_and_ended_flag() {
        let mut chart = ChartState::default();
        chart.select_test("a", "tweak", &history(), &[summary("a")]);

        let newer: HistoryStore = [("a".to_string(), vec![point(1000, 9, Some(1.0))])]
            .into_iter()
            .collect();
        chart.refresh(&newer, &[]);
        let tracked = chart.tracked().unwrap();
        assert_eq!(tracked.series.score.len(), 1);
        assert!(tracked.ended);
    }

    #[test]
    fn refresh_without_tracked_test_is_noop() {
        let mut chart = ChartState::default();
        chart.refresh(&history(), &[summary("a")]);
        assert_eq!(chart, ChartState::default());
    }

    #[test]
    fn score_axis_includes_zero() {
        let points = [
            SeriesPoint { time_ms: 0, value: 5.0 },
            SeriesPoint { time_ms: 1, value: 9.0 },
        ];
        assert_eq!(AxisRange::for_metric(ChartMetric::Score).resolve(&points), (0.0, 9.0));
    }

    #[test]
    fn llr_axis_ignores_data() {
        let points = [SeriesPoint { time_ms: 0, value: 7.5 }];
        assert_eq!(AxisRange::for_metric(ChartMetric::Llr).resolve(&points), (-3.0, 3.0));
    }

    #[test]
    fn flat_series_still_has_height() {
        assert_eq!(AxisRange::for_metric(ChartMetric::Score).resolve(&[]), (-1.0, 1.0));
    }

    #[test]
    fn nan_breaks_the_line() {
        let points = [
            SeriesPoint { time_ms: 0, value: 0.1 },
            SeriesPoint { time_ms: 1000, value: f64::NAN },
            SeriesPoint { time_ms: 2000, value: 0.3 },
            SeriesPoint { time_ms: 3000, value: 0.2 },
        ];
        let frame = ChartFrame {
            time: (0, 3000),
            value: (-3.0, 3.0),
        };
        let path = series_path(&points, &frame);
        assert_eq!(path.matches('M').count(), 2);
        assert_eq!(path.matches('L').count(), 1);
    }

    #[test]
    fn projection_spans_the_plot() {
        let frame = ChartFrame {
            time: (0, 1000),
            value: (-3.0, 3.0),
        };
        let (x0, y_top) = frame.project(SeriesPoint { time_ms: 0, value: 3.0 });
        let (x1, y_bottom) = frame.project(SeriesPoint { time_ms: 1000, value: -9.0 });
        assert_eq!(x0, PAD_LEFT);
        assert_eq!(x1, VIEW_WIDTH - PAD_RIGHT);
        assert_eq!(y_top, PAD_Y);
        assert_eq!(y_bottom, VIEW_HEIGHT - PAD_Y);
    }
}
