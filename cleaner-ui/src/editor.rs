pub mod effects;
pub mod format;
pub mod state;

use std::sync::Arc;

use cleaner_core::{AnnotationState, CleanerConfig};
use dioxus::prelude::*;
use shared_types::ProjectId;

use crate::components::{FatalError, FilterBar, NoticeBanner, Pagination, TextCard, Toast};
use crate::editor::format::{created_label, progress_label};

pub use state::EditorStore;

#[component]
pub fn CleanerView(project_id: String) -> Element {
    let store = EditorStore {
        state: use_signal(|| AnnotationState::from_config(&CleanerConfig::default())),
        fatal: use_signal(|| None::<String>),
        notice: use_signal(|| None::<String>),
    };
    let mut apply_all = use_signal(|| true);
    let project_id_signal = use_signal(|| project_id.clone());

    // Load the project on mount
    use_effect(move || {
        let project_id = ProjectId::new(project_id_signal.peek().clone());
        spawn(effects::open_project(store, project_id));
    });

    if let Some(message) = store.fatal.read().clone() {
        return rsx! {
            style { {EDITOR_STYLES} }
            FatalError { message }
        };
    }

    let state = store.state.read();
    let project_name = state
        .project
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Loading project...".to_string());
    let created = state
        .project
        .as_ref()
        .and_then(|p| created_label(p.created_at));
    let progress = state.progress.as_ref().map(progress_label);
    // each text with the token ids selected in it
    let cards: Vec<_> = state
        .texts
        .as_ref()
        .map(|texts| {
            texts
                .values()
                .map(|text| {
                    let selected = if state.selection.is_on(&text.id) {
                        state.selection.token_ids.clone()
                    } else {
                        Vec::new()
                    };
                    (text.id.to_string(), Arc::clone(text), selected)
                })
                .collect()
        })
        .unwrap_or_default();
    let toast = state.toast.clone().filter(|_| state.show_toast);
    let toast_seq = state.toast_seq;
    let notice = store.notice.read().clone();
    let all_ids = state.text_ids();
    let nothing_loaded = all_ids.is_empty();

    rsx! {
        style { {EDITOR_STYLES} }

        div {
            class: "cleaner",

            div {
                class: "cleaner-header",
                div {
                    h1 { "{project_name}" }
                    if let Some(created) = created {
                        span { class: "muted", "{created}" }
                    }
                }
                div {
                    class: "header-actions",
                    if let Some(progress) = progress {
                        span { class: "progress", "{progress}" }
                    }
                    label {
                        input {
                            r#type: "checkbox",
                            checked: apply_all(),
                            onchange: move |e: FormEvent| apply_all.set(e.checked()),
                        }
                        " Apply to all matches"
                    }
                    button {
                        disabled: nothing_loaded,
                        onclick: move |_| {
                            spawn(effects::save_texts(store, all_ids.clone(), true));
                        },
                        "Save page"
                    }
                }
            }

            if let Some(message) = notice {
                NoticeBanner { store, message }
            }

            FilterBar {
                store,
                filters: state.filters.clone(),
                default_filters: state.default_filters.clone(),
            }

            if state.texts_loading {
                div { class: "muted", "Loading texts..." }
            } else if cards.is_empty() {
                div { class: "muted", "No texts match these filters" }
            } else {
                for (key, text, selected) in cards {
                    TextCard {
                        key: "{key}",
                        store,
                        text,
                        selected,
                        apply_all: apply_all(),
                    }
                }
            }

            Pagination {
                store,
                page: state.page,
                page_count: state.page_count(),
            }

            if let Some(toast) = toast {
                // a new key restarts the dismiss timer
                Toast { key: "{toast_seq}", store, toast }
            }
        }
    }
}

const EDITOR_STYLES: &str = r#"
.cleaner {
    max-width: 960px;
    margin: 0 auto;
    font-family: system-ui, sans-serif;
    user-select: none;
}
.cleaner-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding-bottom: 0.75rem;
    border-bottom: 1px solid #374151;
}
.cleaner-header h1 { margin: 0; font-size: 1.25rem; }
.header-actions { display: flex; gap: 0.75rem; align-items: center; }
.muted { color: #9ca3af; font-size: 0.85rem; }
.progress { font-variant-numeric: tabular-nums; }
.filter-bar { display: flex; gap: 0.5rem; margin: 0.75rem 0; }
.filter-bar input { flex: 1; }
.text-card {
    border: 1px solid #374151;
    border-radius: 6px;
    padding: 0.75rem;
    margin-bottom: 0.75rem;
}
.text-card.saved { border-color: #10b981; }
.text-meta { display: flex; gap: 0.5rem; margin-bottom: 0.5rem; }
.identifier { font-size: 0.75rem; color: #9ca3af; }
.reference { font-style: italic; color: #d1d5db; }
.tokens { display: flex; flex-wrap: wrap; gap: 0.25rem; }
.token { display: inline-flex; align-items: center; border-radius: 4px; padding: 1px; }
.token-input {
    background: transparent;
    color: inherit;
    border: none;
    font: inherit;
    text-align: center;
}
.token-confirmed { background: #065f46; }
.token-suggested { background: #1e3a8a; }
.token-edited { outline: 1px dashed #f59e0b; }
.token-selected { background: #7c3aed; }
.token-hint { font-size: 0.7rem; color: #f59e0b; }
.token-button {
    border: none;
    background: transparent;
    color: inherit;
    cursor: pointer;
    font-size: 0.7rem;
}
.text-actions { display: flex; gap: 0.5rem; justify-content: flex-end; margin-top: 0.5rem; }
.save-button.saved { background: #10b981; }
.secondary { background: #374151; }
.pagination { display: flex; gap: 1rem; justify-content: center; align-items: center; }
.toast, .notice {
    position: fixed;
    right: 1rem;
    padding: 0.75rem 1rem;
    border-radius: 6px;
    display: flex;
    gap: 0.75rem;
}
.toast { bottom: 1rem; background: #1f2937; }
.notice { top: 1rem; background: #7f1d1d; }
.toast-close { border: none; background: transparent; color: inherit; cursor: pointer; }
.fatal { text-align: center; padding: 4rem 1rem; }
"#;
