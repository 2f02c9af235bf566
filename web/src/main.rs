use dioxus::prelude::*;

use ui::components::AppNavbar;
use ui::views::Dashboard;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // Global language code; AppNavbar updates it when the user switches locale.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AppNavbar {}
        // Keyed on the language so the whole page remounts with new strings.
        main {
            key: "{lang_code()}",
            Dashboard {}
        }
    }
}
