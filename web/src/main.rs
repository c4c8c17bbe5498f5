use dioxus::prelude::*;

use ui::views::Dashboard;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Plotly.js powers the actual chart rendering; the Rust side only produces
/// figure JSON.
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");

    // The dataset is loaded exactly once, before the server starts taking
    // requests. A missing or unreadable input file is fatal; there is no
    // recovery path or retry.
    #[cfg(feature = "server")]
    if let Err(err) = api::loader::init_from_disk() {
        dioxus_logger::tracing::error!("failed to load emissions dataset: {err}");
        std::process::exit(1);
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Script { src: PLOTLY_CDN }

        Dashboard {}
    }
}
