use dioxus::prelude::*;

use crate::{
    core::{
        format,
        model::{TestClass, TestSummary},
        snapshot::MISSING_LABEL,
    },
    results::{scroll_to_chart, DashboardState, RenderInstruction},
    t,
};

/// Coordination server the id and username columns link to.
pub const TEST_SERVER: &str = "https://tests.stockfishchess.org";

/// One table row with every display field precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub username: String,
    pub branch_name: String,
    pub llr: String,
    pub games: String,
    pub paused: bool,
    pub class: Option<TestClass>,
    pub tracked: bool,
}

impl TableRow {
    pub fn from_summary(summary: &TestSummary, tracked_id: Option<&str>) -> Self {
        Self {
            id: summary.id.clone(),
            username: summary.username.clone(),
            branch_name: summary.branch_name.clone(),
            llr: format::llr_display(summary.llr),
            games: format::games_display(summary),
            paused: summary.is_paused(),
            class: summary.classification(),
            tracked: tracked_id == Some(summary.id.as_str()),
        }
    }

    pub fn css_class(&self) -> String {
        let mut class = String::from("tests-table__row");
        if self.paused {
            class.push_str(" tests-table__row--paused");
        }
        match self.class {
            Some(TestClass::Regression) => class.push_str(" tests-table__row--regression"),
            Some(TestClass::Improvement) => class.push_str(" tests-table__row--improvement"),
            None => {}
        }
        if self.tracked {
            class.push_str(" tests-table__row--tracked");
        }
        class
    }

    pub fn test_url(&self) -> String {
        format!("{TEST_SERVER}/tests/view/{}", self.id)
    }

    /// `None` when the username is unknown.
    pub fn user_url(&self) -> Option<String> {
        (self.username != MISSING_LABEL)
            .then(|| format!("{TEST_SERVER}/tests/user/{}", self.username))
    }
}

/// What the table body shows.
#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Error(String),
    NoData,
    NoMatches,
    Rows(Vec<TableRow>),
}

/// Case-insensitive substring match on username, branch or id. A blank query
/// keeps everything.
pub fn filter_summaries<'a>(summaries: &'a [TestSummary], query: &str) -> Vec<&'a TestSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return summaries.iter().collect();
    }
    summaries
        .iter()
        .filter(|summary| {
            [&summary.username, &summary.branch_name, &summary.id]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn table_body(
    visible: &[&TestSummary],
    all: &[TestSummary],
    load_error: Option<&str>,
    tracked_id: Option<&str>,
) -> TableBody {
    if let Some(err) = load_error {
        return TableBody::Error(err.to_string());
    }
    if all.is_empty() {
        return TableBody::NoData;
    }
    if visible.is_empty() {
        return TableBody::NoMatches;
    }
    TableBody::Rows(
        visible
            .iter()
            .map(|summary| TableRow::from_summary(summary, tracked_id))
            .collect(),
    )
}

#[component]
pub fn TestsTable(state: Signal<DashboardState>) -> Element {
    let body = state.read().table_body();

    rsx! {
        section { class: "results-card tests-table",
            table { class: "tests-table__grid",
                thead {
                    tr {
                        th { {t!("column-test")} }
                        th { {t!("column-user")} }
                        th { {t!("column-branch")} }
                        th { {t!("column-llr")} }
                        th { {t!("column-games")} }
                    }
                }
                tbody {
                    match body {
                        TableBody::Error(err) => rsx! {
                            tr { class: "tests-table__placeholder tests-table__placeholder--error",
                                td { colspan: "5", {t!("table-load-error", error = err)} }
                            }
                        },
                        TableBody::NoData => rsx! {
                            tr { class: "tests-table__placeholder",
                                td { colspan: "5", {t!("table-no-data")} }
                            }
                        },
                        TableBody::NoMatches => rsx! {
                            tr { class: "tests-table__placeholder",
                                td { colspan: "5", {t!("table-no-matches")} }
                            }
                        },
                        TableBody::Rows(rows) => rsx! {
                            for row in rows.into_iter() {
                                {render_row(row, state)}
                            }
                        },
                    }
                }
            }
        }
    }
}

fn render_row(row: TableRow, mut state: Signal<DashboardState>) -> Element {
    let class = row.css_class();
    let test_url = row.test_url();
    let user_url = row.user_url();
    let TableRow {
        id,
        username,
        branch_name,
        llr,
        games,
        ..
    } = row;

    let select = {
        let id = id.clone();
        let branch = branch_name.clone();
        move |_| {
            let instruction = state.write().on_test_selected(&id, &branch);
            if matches!(
                instruction,
                RenderInstruction::Chart | RenderInstruction::ScrollToChart
            ) {
                scroll_to_chart();
            }
        }
    };

    rsx! {
        tr { key: "{id}", class: "{class}", onclick: select,
            td {
                a {
                    href: "{test_url}",
                    target: "_blank",
                    rel: "noopener",
                    onclick: move |evt: MouseEvent| evt.stop_propagation(),
                    "{id}"
                }
            }
            td {
                if let Some(url) = user_url {
                    a {
                        href: "{url}",
                        target: "_blank",
                        rel: "noopener",
                        onclick: move |evt: MouseEvent| evt.stop_propagation(),
                        "{username}"
                    }
                } else {
                    "{username}"
                }
            }
            td {
                a { class: "tests-table__branch", href: "#progress-chart", "{branch_name}" }
            }
            td { "{llr}" }
            td { "{games}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, username: &str, branch: &str) -> TestSummary {
        TestSummary {
            id: id.into(),
            username: username.into(),
            branch_name: branch.into(),
            llr: None,
            wins_minus_losses: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            total_games: 0,
            worker_count: 2,
            sprt_reference_elo0: None,
        }
    }

    fn fixtures() -> Vec<TestSummary> {
        vec![
            summary("65aa01", "Vondele", "simplify-qsearch"),
            summary("65aa02", "snicolet", "lmr-tweak"),
            summary("65bb03", "N/A", "VONDELE-history"),
        ]
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let all = fixtures();
        let ids: Vec<_> = filter_summaries(&all, "").iter().map(|s| &s.id).collect();
        assert_eq!(ids, vec!["65aa01", "65aa02", "65bb03"]);
        assert_eq!(filter_summaries(&all, "   ").len(), 3);
    }

    #[test]
    fn matches_username_branch_or_id_case_insensitively() {
        let all = fixtures();
        let ids: Vec<_> = filter_summaries(&all, "vondele")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["65aa01", "65bb03"]);

        let by_id: Vec<_> = filter_summaries(&all, "AA02").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(by_id, vec!["65aa02"]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filter_summaries(&fixtures(), "zzz").is_empty());
    }

    #[test]
    fn empty_states_are_distinguished() {
        let all = fixtures();
        assert_eq!(table_body(&[], &[], None, None), TableBody::NoData);
        assert_eq!(table_body(&[], &all, None, None), TableBody::NoMatches);
        assert_eq!(
            table_body(&[], &[], Some("boom"), None),
            TableBody::Error("boom".into())
        );
    }

    #[test]
    fn rows_carry_derived_fields() {
        let mut s = summary("t", "user", "branch");
        s.wins = 3;
        s.losses = 1;
        s.total_games = 4;
        s.llr = Some(1.47221948958322);
        s.worker_count = 0;
        s.sprt_reference_elo0 = Some(0.0);

        let row = TableRow::from_summary(&s, Some("t"));
        assert_eq!(row.games, "4 (75.00%)");
        assert_eq!(row.llr, "1.47 (50%)");
        assert_eq!(
            row.css_class(),
            "tests-table__row tests-table__row--paused tests-table__row--improvement tests-table__row--tracked"
        );
    }

    #[test]
    fn rows_without_elo0_are_not_tinted() {
        let row = TableRow::from_summary(&summary("t", "u", "b"), None);
        assert_eq!(row.css_class(), "tests-table__row");
    }

    #[test]
    fn negative_elo0_is_regression() {
        let mut s = summary("t", "u", "b");
        s.sprt_reference_elo0 = Some(-1.75);
        let row = TableRow::from_summary(&s, None);
        assert!(row.css_class().contains("tests-table__row--regression"));
    }

    #[test]
    fn unknown_user_has_no_link() {
        let row = TableRow::from_summary(&summary("t", MISSING_LABEL, "b"), None);
        assert_eq!(row.user_url(), None);
        assert_eq!(row.test_url(), format!("{TEST_SERVER}/tests/view/t"));
    }
}
