use crate::{
    core::{history::HistoryStore, model::TestSummary, timing},
    results::{
        chart::{ChartMetric, ChartState, Selection},
        loader::LoadError,
        table::{self, TableBody},
    },
};

/// Which part of the page an event invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderInstruction {
    Nothing,
    Table,
    Chart,
    /// Selection was already tracked; bring the chart into view.
    ScrollToChart,
    Everything,
}

/// Everything the dashboard shows, owned in one place and mutated only by
/// the `on_*` handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub summaries: Vec<TestSummary>,
    pub history: HistoryStore,
    pub filter: String,
    pub load_error: Option<String>,
    pub chart: ChartState,
    /// Set once the first load finished, successfully or not.
    pub loaded: bool,
}

impl DashboardState {
    /// Replace both payloads wholesale; a failed load clears them.
    pub fn on_data_loaded(
        &mut self,
        result: Result<(Vec<TestSummary>, HistoryStore), LoadError>,
    ) -> RenderInstruction {
        match result {
            Ok((summaries, history)) => {
                self.summaries = summaries;
                self.history = history;
                self.load_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "dashboard data failed to load");
                self.summaries.clear();
                self.history = HistoryStore::default();
                self.load_error = Some(err.to_string());
            }
        }
        self.loaded = true;
        self.chart.refresh(&self.history, &self.summaries);
        RenderInstruction::Everything
    }

    pub fn on_filter_changed(&mut self, text: &str) -> RenderInstruction {
        if self.filter == text {
            return RenderInstruction::Nothing;
        }
        self.filter = text.to_string();
        RenderInstruction::Table
    }

    pub fn on_test_selected(&mut self, id: &str, branch_name: &str) -> RenderInstruction {
        match self
            .chart
            .select_test(id, branch_name, &self.history, &self.summaries)
        {
            Selection::Unchanged => RenderInstruction::ScrollToChart,
            Selection::Replaced => RenderInstruction::Chart,
        }
    }

    pub fn on_metric_toggled(&mut self, metric: ChartMetric) -> RenderInstruction {
        self.chart.toggle_metric(metric);
        RenderInstruction::Chart
    }

    pub fn visible_summaries(&self) -> Vec<&TestSummary> {
        table::filter_summaries(&self.summaries, &self.filter)
    }

    pub fn table_body(&self) -> TableBody {
        table::table_body(
            &self.visible_summaries(),
            &self.summaries,
            self.load_error.as_deref(),
            self.chart.tracked().map(|t| t.id.as_str()),
        )
    }

    pub fn status(&self, now_seconds: i64) -> Status {
        if self.load_error.is_some() {
            return Status::Error;
        }
        if !self.loaded {
            return Status::Loading;
        }
        match self.history.latest_timestamp() {
            Some(latest) => Status::Updated {
                age: timing::human_age(now_seconds - latest),
                at: timing::format_utc(latest),
            },
            None => Status::NoData,
        }
    }
}

/// Contents of the "last update" line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    NoData,
    Error,
    Updated { age: String, at: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::HistoryPoint;
    use crate::core::snapshot::MISSING_LABEL;

    fn summary(id: &str, username: &str) -> TestSummary {
        TestSummary {
            id: id.into(),
            username: username.into(),
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

    fn loaded_state() -> DashboardState {
        let history: HistoryStore = [(
            "a".to_string(),
            vec![HistoryPoint {
                timestamp_seconds: 1_700_000_000,
                wins_minus_losses: 2,
                llr: Some(0.3),
            }],
        )]
        .into_iter()
        .collect();
        let mut state = DashboardState::default();
        state.on_data_loaded(Ok((vec![summary("a", "alice"), summary("b", "bob")], history)));
        state
    }

    #[test]
    fn filter_narrows_visible_rows() {
        let mut state = loaded_state();
        assert_eq!(state.on_filter_changed("ALI"), RenderInstruction::Table);
        let ids: Vec<_> = state.visible_summaries().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(state.on_filter_changed("ALI"), RenderInstruction::Nothing);
    }

    #[test]
    fn failed_load_resets_data_and_shows_error() {
        let mut state = loaded_state();
        state.on_test_selected("a", "branch");
        state.on_data_loaded(Err(LoadError::Status {
            what: "tests.json",
            status: 404,
        }));
        assert!(state.summaries.is_empty());
        assert!(state.history.is_empty());
        assert!(matches!(state.table_body(), TableBody::Error(_)));
        assert_eq!(state.status(0), Status::Error);
        let tracked = state.chart.tracked().unwrap();
        assert!(tracked.ended);
        assert!(tracked.series.is_empty());
    }

    #[test]
    fn reselecting_asks_for_scroll_only() {
        let mut state = loaded_state();
        assert_eq!(state.on_test_selected("a", "x"), RenderInstruction::Chart);
        assert_eq!(state.on_test_selected("a", "x"), RenderInstruction::ScrollToChart);
    }

    #[test]
    fn status_reports_latest_history_time() {
        let state = loaded_state();
        assert_eq!(
            state.status(1_700_000_000 + 600),
            Status::Updated {
                age: "10m".into(),
                at: "2023-11-14 22:13 UTC".into(),
            }
        );
    }

    #[test]
    fn status_before_first_load_is_loading() {
        assert_eq!(DashboardState::default().status(0), Status::Loading);
    }

    #[test]
    fn empty_history_reports_no_data() {
        let mut state = DashboardState::default();
        state.on_data_loaded(Ok((Vec::new(), HistoryStore::default())));
        assert_eq!(state.status(0), Status::NoData);
        assert_eq!(state.table_body(), TableBody::NoData);
    }

    #[test]
    fn metric_toggle_reaches_chart() {
        let mut state = loaded_state();
        state.on_test_selected("a", "x");
        state.on_metric_toggled(ChartMetric::Score);
        assert_eq!(state.chart.metric(), ChartMetric::Score);
    }
}
