use dioxus::prelude::*;

use crate::{
    core::timing,
    results::{DashboardState, Status},
    t,
};

/// How often the relative "last update" age is recomputed. No data is
/// re-fetched on this tick.
const STATUS_REFRESH_MS: u32 = 30_000;

#[component]
pub fn StatusLine(state: Signal<DashboardState>) -> Element {
    let mut now = use_signal(timing::now_unix_seconds);

    use_future(move || async move {
        loop {
            timing::sleep_ms(STATUS_REFRESH_MS).await;
            now.set(timing::now_unix_seconds());
        }
    });

    let status = state.read().status(now());
    let (class, text) = match status {
        Status::Loading => ("status-line", t!("status-loading")),
        Status::NoData => ("status-line", t!("status-no-data")),
        Status::Error => ("status-line status-line--error", t!("status-error")),
        Status::Updated { age, at } => ("status-line", t!("status-updated", age = age, at = at)),
    };

    rsx! {
        p { class: "{class}", "{text}" }
    }
}
