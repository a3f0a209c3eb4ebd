use std::sync::Arc;

use cleaner_core::{Action, ToastInfo};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use shared_types::{Filters, SavedFilter, SortRank, Text, TextId, Token, TokenId, TokenState};

use crate::editor::effects;
use crate::editor::format::{has_pending_edit, input_width, page_label, toast_message, token_class};
use crate::editor::EditorStore;

const TOAST_TIMEOUT_MS: u32 = 4000;

#[component]
pub fn TokenView(
    store: EditorStore,
    text_id: TextId,
    token: Token,
    selected: bool,
    apply_all: bool,
) -> Element {
    let class = token_class(&token, selected);
    let width = input_width(&token.current_value);
    let index = token.index;
    let pending = has_pending_edit(&token);
    let can_accept = token.suggestion().is_some();
    let can_delete = token.state != TokenState::Original;
    let title = format!("original: {}", token.value);

    let down_text = text_id.clone();
    let onmousedown = move |e: MouseEvent| {
        let text_id = down_text.clone();
        if e.modifiers().shift() {
            store.dispatch(Action::ToggleTokenSelect { text_id, index });
        } else {
            store.dispatch(Action::SelectionStart { text_id, index });
        }
    };

    let enter_text = text_id.clone();
    let onmouseenter = move |_| {
        // hovering without a drag must not touch the signal
        if !store.state.peek().selection.is_dragging_on(&enter_text) {
            return;
        }
        store.dispatch(Action::SelectionMove {
            text_id: enter_text.clone(),
            index,
        });
    };

    let up_text = text_id.clone();
    let onmouseup = move |_| {
        store.dispatch(Action::SelectionEnd {
            text_id: up_text.clone(),
            index,
        });
    };

    let input_text = text_id.clone();
    let input_token = token.id.clone();
    let oninput = move |e: FormEvent| {
        store.dispatch(Action::UpdateTokenValue {
            text_id: input_text.clone(),
            token_id: input_token.clone(),
            value: e.value(),
        });
    };

    let key_text = text_id.clone();
    let key_token = token.clone();
    let onkeydown = move |e: KeyboardEvent| match e.key() {
        Key::Enter if has_pending_edit(&key_token) => {
            e.prevent_default();
            spawn(effects::apply_replacement(
                store,
                key_text.clone(),
                key_token.id.clone(),
                key_token.current_value.clone(),
                apply_all,
            ));
        }
        Key::Escape => {
            store.dispatch(Action::UpdateTokenValue {
                text_id: key_text.clone(),
                token_id: key_token.id.clone(),
                value: key_token.resolved_value().to_string(),
            });
        }
        _ => {}
    };

    let accept_text = text_id.clone();
    let accept_token = token.id.clone();
    let delete_text = text_id.clone();
    let delete_token = token.id.clone();

    rsx! {
        span {
            class: "{class}",
            title: "{title}",
            onmousedown,
            onmouseenter,
            onmouseup,
            input {
                class: "token-input",
                value: "{token.current_value}",
                size: "{width}",
                oninput,
                onkeydown,
            }
            if pending {
                span { class: "token-hint", "⏎" }
            }
            if can_accept {
                button {
                    class: "token-button accept",
                    title: "Accept suggestion",
                    onclick: move |_| {
                        spawn(effects::accept_suggestion(
                            store,
                            accept_text.clone(),
                            accept_token.clone(),
                            apply_all,
                        ));
                    },
                    "✓"
                }
            }
            if can_delete {
                button {
                    class: "token-button delete",
                    title: "Delete replacement",
                    onclick: move |_| {
                        spawn(effects::delete_replacement(
                            store,
                            delete_text.clone(),
                            delete_token.clone(),
                            apply_all,
                        ));
                    },
                    "✕"
                }
            }
        }
    }
}

#[component]
pub fn TextCard(
    store: EditorStore,
    text: Arc<Text>,
    selected: Vec<TokenId>,
    apply_all: bool,
) -> Element {
    let text_id = text.id.clone();
    let single = selected.first().cloned().filter(|_| selected.len() == 1);
    let can_tokenize = selected.len() >= 2;
    let saved = text.saved;

    let split_target = single.clone().map(|token_id| (text_id.clone(), token_id));
    let remove_target = split_target.clone();
    let save_text = text_id.clone();

    rsx! {
        div {
            class: if saved { "text-card saved" } else { "text-card" },
            onmouseleave: move |_| store.dispatch(Action::SelectionCancel),

            div {
                class: "text-meta",
                for identifier in text.identifiers.iter() {
                    span { class: "identifier", "{identifier}" }
                }
                if let Some(reference) = text.reference.as_ref() {
                    div { class: "reference", "{reference}" }
                }
            }

            div {
                class: "tokens",
                for token in text.tokens.iter() {
                    TokenView {
                        key: "{token.id}",
                        store,
                        text_id: text_id.clone(),
                        token: token.clone(),
                        selected: selected.contains(&token.id),
                        apply_all,
                    }
                }
            }

            div {
                class: "text-actions",
                if let Some((text_id, token_id)) = split_target {
                    button {
                        onclick: move |_| {
                            spawn(effects::split_token(store, text_id.clone(), token_id.clone()));
                        },
                        "Split"
                    }
                }
                if let Some((text_id, token_id)) = remove_target {
                    button {
                        onclick: move |_| {
                            spawn(effects::remove_token(
                                store,
                                text_id.clone(),
                                token_id.clone(),
                                apply_all,
                            ));
                        },
                        "Remove"
                    }
                }
                if can_tokenize {
                    button {
                        onclick: move |_| {
                            spawn(effects::tokenize_selection(store));
                        },
                        "Merge"
                    }
                }
                if !selected.is_empty() {
                    button {
                        class: "secondary",
                        onclick: move |_| store.dispatch(Action::ClearSelection),
                        "Clear selection"
                    }
                }
                button {
                    class: if saved { "save-button saved" } else { "save-button" },
                    onclick: move |_| {
                        spawn(effects::save_texts(store, vec![save_text.clone()], !saved));
                    },
                    if saved { "Saved" } else { "Save" }
                }
            }
        }
    }
}

#[component]
pub fn FilterBar(store: EditorStore, filters: Filters, default_filters: Filters) -> Element {
    let mut draft = use_signal(|| filters.clone());

    let submit = move |_| {
        spawn(effects::set_filters(store, draft()));
    };

    let reset = move |_| {
        draft.set(default_filters.clone());
        spawn(effects::reset_filters(store));
    };

    rsx! {
        div {
            class: "filter-bar",
            input {
                placeholder: "Search tokens",
                value: "{draft.read().search_term}",
                oninput: move |e: FormEvent| draft.write().search_term = e.value(),
                onkeydown: move |e: KeyboardEvent| {
                    if e.key() == Key::Enter {
                        spawn(effects::set_filters(store, draft()));
                    }
                },
            }
            input {
                placeholder: "Search reference",
                value: "{draft.read().reference_search_term}",
                oninput: move |e: FormEvent| draft.write().reference_search_term = e.value(),
            }
            select {
                value: match draft.read().saved {
                    SavedFilter::All => "all",
                    SavedFilter::Yes => "yes",
                    SavedFilter::No => "no",
                },
                onchange: move |e: FormEvent| {
                    draft.write().saved = match e.value().as_str() {
                        "yes" => SavedFilter::Yes,
                        "no" => SavedFilter::No,
                        _ => SavedFilter::All,
                    };
                },
                option { value: "all", "All texts" }
                option { value: "yes", "Saved" }
                option { value: "no", "Unsaved" }
            }
            button {
                class: "secondary",
                onclick: move |_| {
                    let mut next = draft.write();
                    next.rank = match next.rank {
                        SortRank::Ascending => SortRank::Descending,
                        SortRank::Descending => SortRank::Ascending,
                    };
                },
                if draft.read().rank == SortRank::Ascending { "Rank ↑" } else { "Rank ↓" }
            }
            button { onclick: submit, "Filter" }
            button { class: "secondary", onclick: reset, "Reset" }
        }
    }
}

#[component]
pub fn Pagination(store: EditorStore, page: u32, page_count: u32) -> Element {
    let label = page_label(page, page_count);
    let has_prev = page > 1;
    let has_next = page < page_count;

    rsx! {
        div {
            class: "pagination",
            button {
                disabled: !has_prev,
                onclick: move |_| {
                    spawn(effects::change_page(store, page - 1));
                },
                "‹ Prev"
            }
            span { "{label}" }
            button {
                disabled: !has_next,
                onclick: move |_| {
                    spawn(effects::change_page(store, page + 1));
                },
                "Next ›"
            }
        }
    }
}

#[component]
pub fn Toast(store: EditorStore, toast: ToastInfo) -> Element {
    let message = toast_message(&toast);

    use_effect(move || {
        spawn(async move {
            TimeoutFuture::new(TOAST_TIMEOUT_MS).await;
            store.dispatch(Action::SetShowToast { show: false });
        });
    });

    rsx! {
        div {
            class: "toast",
            span { "{message}" }
            button {
                class: "toast-close",
                onclick: move |_| store.dispatch(Action::SetShowToast { show: false }),
                "×"
            }
        }
    }
}

#[component]
pub fn NoticeBanner(store: EditorStore, message: String) -> Element {
    rsx! {
        div {
            class: "notice",
            span { "{message}" }
            button {
                class: "toast-close",
                onclick: move |_| store.dismiss_notice(),
                "×"
            }
        }
    }
}

#[component]
pub fn FatalError(message: String) -> Element {
    rsx! {
        div {
            class: "fatal",
            h2 { "Something went wrong" }
            p { "{message}" }
            button {
                onclick: move |_| {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                },
                "Reload"
            }
        }
    }
}
