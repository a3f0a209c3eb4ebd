use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use cleaner_ui::editor::format::project_id_from_path;
use cleaner_ui::CleanerView;

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    launch(App);
}

fn current_project_id() -> Option<String> {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    project_id_from_path(&path)
}

#[component]
fn App() -> Element {
    let project_id = use_signal(current_project_id);

    rsx! {
        div {
            style: "min-height: 100vh; background-color: #111827; color: white; padding: 1rem;",
            if let Some(project_id) = project_id() {
                CleanerView { project_id }
            } else {
                p { "Open a project at /project/<id>" }
            }
        }
    }
}
