use dioxus::prelude::*;

use crate::{results::DashboardState, t};

#[component]
pub fn FilterInput(mut state: Signal<DashboardState>) -> Element {
    let value = state.read().filter.clone();
    let placeholder = t!("filter-placeholder");

    rsx! {
        div { class: "tests-filter",
            label { class: "visually-hidden", r#for: "tests-filter-input", {t!("filter-label")} }
            input {
                id: "tests-filter-input",
                r#type: "search",
                placeholder: "{placeholder}",
                value: "{value}",
                oninput: move |evt: FormEvent| {
                    state.write().on_filter_changed(&evt.value());
                },
            }
        }
    }
}
