use dioxus::prelude::*;

use crate::results::{
    load_dashboard_data, DashboardState, FilterInput, ProgressChart, StatusLine, TestsTable,
};

#[component]
pub fn Dashboard() -> Element {
    // Subscribe to the global language code (if provided) so the page
    // re-renders when the locale changes.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let mut state = use_signal(DashboardState::default);

    // One load per page visit; a full reload is the retry path.
    use_future(move || async move {
        let result = load_dashboard_data().await;
        state.write().on_data_loaded(result);
    });

    rsx! {
        div { style: "display:none", "{lang_marker}" }
        section { class: "page page-dashboard",
            div { class: "page-dashboard__header",
                h1 { {crate::t!("page-title")} }
                StatusLine { state }
            }
            p { {crate::t!("page-intro")} }

            FilterInput { state }

            div { class: "dashboard__panels",
                TestsTable { state }
                ProgressChart { state }
            }
        }
    }
}
