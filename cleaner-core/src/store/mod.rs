//! Annotation state store
//!
//! `reduce` is the single transition function of an annotation page. It runs
//! synchronously; network calls happen before dispatch and their results
//! arrive as context-stamped actions.

mod action;
mod state;

use std::sync::Arc;

use shared_types::{StructuralEditResponse, Text, TextId, Token, TokenId, TokenMutationResponse};

pub use action::{Action, ACTION_KINDS};
pub use state::{AnnotationState, RequestContext, ToastInfo, ToastKind, DEFAULT_PAGE_SIZE};

use crate::error::StoreError;
use crate::mutation::{mutate_tokens, TokenOp, Texts};

/// Apply `action` to `state`.
///
/// Server-confirmed actions whose request context is stale are dropped and
/// leave `state` untouched. An error means the dispatcher is broken and the
/// page should be torn down.
pub fn reduce(state: &mut AnnotationState, action: Action) -> Result<(), StoreError> {
    if let Some(context) = action.context() {
        if !state.is_current(context) {
            tracing::debug!(
                action = action.kind(),
                ?context,
                current = ?state.request_context(),
                "Dropping stale server response"
            );
            return Ok(());
        }
    }

    match action {
        Action::SetProjectId { project_id } => {
            state.project_id = Some(project_id);
            state.bump_generation();
        }
        Action::SetProject { project, .. } => {
            state.reset_keeping_project();
            state.project = Some(project);
            state.project_loading = false;
            state.texts_loading = true;
            state.bump_generation();
        }
        Action::SetTexts { page, .. } => {
            ensure_contiguous(&page.texts)?;
            state.texts = Some(
                page.texts
                    .into_iter()
                    .map(|text| (text.id.clone(), Arc::new(text)))
                    .collect(),
            );
            state.total_texts = page.total_count;
            state.texts_loading = false;
            state.selection.clear();
        }
        Action::SetPage { page } => {
            state.page = page.max(1);
            state.texts_loading = true;
            state.selection.clear();
            state.bump_generation();
        }
        Action::SetFilters { filters } => {
            state.filters = filters;
            restart_listing(state);
        }
        Action::ResetFilters => {
            state.filters = state.default_filters.clone();
            restart_listing(state);
        }
        Action::SetProgress { progress, .. } => {
            state.progress = Some(progress);
        }
        Action::SaveTexts {
            text_ids, saved, ..
        } => {
            if let Some(texts) = state.texts.as_mut() {
                for text_id in &text_ids {
                    if let Some(text) = texts.get_mut(text_id) {
                        if text.saved != saved {
                            Arc::make_mut(text).saved = saved;
                        }
                    }
                }
            }
        }
        Action::UpdateTokenValue {
            text_id,
            token_id,
            value,
        } => {
            let text = state
                .texts
                .as_mut()
                .and_then(|texts| texts.get_mut(&text_id));
            if let Some(text) = text {
                // copy the text only when it holds the token
                if let Some(pos) = text.tokens.iter().position(|t| t.id == token_id) {
                    Arc::make_mut(text).tokens[pos].current_value = value;
                }
            }
        }
        Action::TokenApply {
            focus_token_id,
            replacement,
            response,
            ..
        } => {
            let toast = ToastInfo {
                kind: ToastKind::Apply,
                content: replacement.clone(),
                count: response.matches,
            };
            let op = TokenOp::Apply {
                focus: focus_token_id,
                replacement,
            };
            apply_token_op(state, &response, &op, toast);
        }
        Action::TokenDelete {
            focus_token_id,
            response,
            ..
        } => {
            let content = focus_value(state.texts.as_ref(), &response, &focus_token_id, |t| {
                t.resolved_value().to_string()
            });
            let toast = ToastInfo {
                kind: ToastKind::Delete,
                content,
                count: response.matches,
            };
            apply_token_op(state, &response, &TokenOp::Delete, toast);
        }
        Action::TokenAccept {
            focus_token_id,
            response,
            ..
        } => {
            let content = focus_value(state.texts.as_ref(), &response, &focus_token_id, |t| {
                t.suggestion().unwrap_or(t.current_value.as_str()).to_string()
            });
            let toast = ToastInfo {
                kind: ToastKind::Accept,
                content,
                count: response.matches,
            };
            apply_token_op(state, &response, &TokenOp::Accept, toast);
        }
        Action::TokenSplit { response, .. } => {
            install_structural_edit(state, response, ToastKind::Split)?;
        }
        Action::TokenRemove { response, .. } => {
            install_structural_edit(state, response, ToastKind::Remove)?;
        }
        Action::Tokenize { response, .. } => {
            install_structural_edit(state, response, ToastKind::Tokenize)?;
        }
        Action::SetShowToast { show } => {
            state.show_toast = show;
        }
        Action::SelectionStart { text_id, index } => {
            if let Some(text) = state.text(&text_id).cloned() {
                state.selection.begin(&text, index);
            }
        }
        Action::SelectionMove { text_id, index } => {
            if let Some(text) = state.text(&text_id).cloned() {
                state.selection.extend(&text, index);
            }
        }
        Action::SelectionEnd { text_id, index } => {
            if let Some(text) = state.text(&text_id).cloned() {
                state.selection.finish(&text, index);
            }
        }
        Action::SelectionCancel => {
            state.selection.cancel();
        }
        Action::ToggleTokenSelect { text_id, index } => {
            if let Some(text) = state.text(&text_id).cloned() {
                state.selection.toggle(&text, index);
            }
        }
        Action::ClearSelection => {
            state.selection.clear();
        }
    }

    Ok(())
}

/// Parse an untyped action envelope and reduce it.
pub fn dispatch_json(state: &mut AnnotationState, value: serde_json::Value) -> Result<(), StoreError> {
    let action = Action::from_json(value).inspect_err(|e| {
        tracing::error!(error = %e, "Rejected action");
    })?;
    reduce(state, action)
}

fn restart_listing(state: &mut AnnotationState) {
    state.page = 1;
    state.texts_loading = true;
    state.selection.clear();
    state.bump_generation();
}

fn ensure_contiguous(texts: &[Text]) -> Result<(), StoreError> {
    match texts.iter().find(|text| !text.has_contiguous_indices()) {
        Some(text) => Err(StoreError::NonContiguousIndices(text.id.clone())),
        None => Ok(()),
    }
}

fn apply_token_op(
    state: &mut AnnotationState,
    response: &TokenMutationResponse,
    op: &TokenOp,
    toast: ToastInfo,
) {
    let Some(texts) = state.texts.as_ref() else {
        return;
    };
    state.texts = Some(mutate_tokens(texts, &response.text_token_ids, op));
    state.raise_toast(toast);
}

fn focus_value(
    texts: Option<&Texts>,
    response: &TokenMutationResponse,
    focus: &TokenId,
    pick: impl Fn(&Token) -> String,
) -> String {
    let Some(texts) = texts else {
        return String::new();
    };
    response
        .text_token_ids
        .keys()
        .chain(texts.keys())
        .filter_map(|text_id: &TextId| texts.get(text_id))
        .find_map(|text| text.token(focus))
        .map(pick)
        .unwrap_or_default()
}

fn install_structural_edit(
    state: &mut AnnotationState,
    response: StructuralEditResponse,
    kind: ToastKind,
) -> Result<(), StoreError> {
    ensure_contiguous(&response.texts)?;

    let count = response.matches.max(1);
    if let Some(texts) = state.texts.as_mut() {
        for text in response.texts {
            if let Some(slot) = texts.get_mut(&text.id) {
                *slot = Arc::new(text);
            } else {
                tracing::debug!(text_id = %text.id, "Structural edit for a text not on this page");
            }
        }
    }

    state.selection.clear();
    state.raise_toast(ToastInfo {
        kind,
        content: String::new(),
        count,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Filters, Project, ProjectId, TextPage};

    fn sample_text(id: &str, values: &[&str]) -> Text {
        Text {
            id: TextId::new(id),
            tokens: values
                .iter()
                .enumerate()
                .map(|(i, v)| Token::new(format!("{id}-{i}"), i as u32, *v))
                .collect(),
            saved: false,
            identifiers: Vec::new(),
            reference: None,
            original: values.join(" "),
        }
    }

    fn loaded_state() -> AnnotationState {
        let mut state = AnnotationState::default();
        reduce(
            &mut state,
            Action::SetProjectId {
                project_id: ProjectId::new("p1"),
            },
        )
        .unwrap();
        let context = state.request_context();
        reduce(
            &mut state,
            Action::SetProject {
                context,
                project: Project {
                    id: ProjectId::new("p1"),
                    name: "demo".into(),
                    description: String::new(),
                    parallel_corpus: false,
                    created_at: None,
                },
            },
        )
        .unwrap();
        let context = state.request_context();
        reduce(
            &mut state,
            Action::SetTexts {
                context,
                page: TextPage {
                    texts: vec![sample_text("a", &["teh", "cat"]), sample_text("b", &["teh"])],
                    total_count: 2,
                },
            },
        )
        .unwrap();
        state
    }

    #[test]
    fn test_stale_texts_are_dropped() {
        let mut state = loaded_state();
        let stale = state.request_context();
        reduce(&mut state, Action::SetPage { page: 2 }).unwrap();

        reduce(
            &mut state,
            Action::SetTexts {
                context: stale,
                page: TextPage {
                    texts: vec![sample_text("zzz", &["x"])],
                    total_count: 1,
                },
            },
        )
        .unwrap();

        assert!(state.texts_loading);
        assert!(state.text(&TextId::new("zzz")).is_none());
        assert_eq!(state.total_texts, 2);
    }

    #[test]
    fn test_non_contiguous_page_is_rejected() {
        let mut state = loaded_state();
        let mut broken = sample_text("c", &["a", "b"]);
        broken.tokens[1].index = 5;

        let context = state.request_context();
        let err = reduce(
            &mut state,
            Action::SetTexts {
                context,
                page: TextPage {
                    texts: vec![broken],
                    total_count: 1,
                },
            },
        )
        .unwrap_err();
        assert_eq!(err, StoreError::NonContiguousIndices(TextId::new("c")));
        assert!(state.text(&TextId::new("a")).is_some());
    }

    #[test]
    fn test_dispatch_json_rejects_unknown() {
        let mut state = loaded_state();
        let err = dispatch_json(&mut state, serde_json::json!({"type": "NOPE"})).unwrap_err();
        assert_eq!(err, StoreError::UnknownAction("NOPE".into()));
    }

    #[test]
    fn test_update_token_value_only_touches_one_text() {
        let mut state = loaded_state();
        let b_before = Arc::clone(state.text(&TextId::new("b")).unwrap());

        reduce(
            &mut state,
            Action::UpdateTokenValue {
                text_id: TextId::new("a"),
                token_id: TokenId::new("a-0"),
                value: "th".into(),
            },
        )
        .unwrap();

        let a = state.text(&TextId::new("a")).unwrap();
        assert_eq!(a.tokens[0].current_value, "th");
        assert_eq!(a.tokens[0].value, "teh");
        assert!(Arc::ptr_eq(&b_before, state.text(&TextId::new("b")).unwrap()));
    }

    #[test]
    fn test_delete_toast_reports_previous_value() {
        let mut state = loaded_state();
        let context = state.request_context();
        let targets = TokenMutationResponse {
            text_token_ids: [(TextId::new("a"), vec![TokenId::new("a-0")])].into(),
            matches: 1,
        };
        reduce(
            &mut state,
            Action::TokenApply {
                context: context.clone(),
                focus_token_id: TokenId::new("a-0"),
                replacement: "the".into(),
                response: targets.clone(),
            },
        )
        .unwrap();
        reduce(
            &mut state,
            Action::TokenDelete {
                context,
                focus_token_id: TokenId::new("a-0"),
                response: targets,
            },
        )
        .unwrap();

        let toast = state.toast.clone().unwrap();
        assert_eq!(toast.kind, ToastKind::Delete);
        assert_eq!(toast.content, "the");
        assert!(state.show_toast);
        assert_eq!(state.toast_seq, 2);
    }

    #[test]
    fn test_update_unknown_token_keeps_text_shared() {
        let mut state = loaded_state();
        let a_before = Arc::clone(state.text(&TextId::new("a")).unwrap());

        reduce(
            &mut state,
            Action::UpdateTokenValue {
                text_id: TextId::new("a"),
                token_id: TokenId::new("nope"),
                value: "x".into(),
            },
        )
        .unwrap();

        assert!(Arc::ptr_eq(&a_before, state.text(&TextId::new("a")).unwrap()));
    }

    #[test]
    fn test_huge_page_number_saturates_skip() {
        let mut state = loaded_state();
        dispatch_json(
            &mut state,
            serde_json::json!({"type": "SET_PAGE", "payload": {"page": 500_000_000u32}}),
        )
        .unwrap();

        let request = state.filter_request().unwrap();
        assert_eq!(request.skip, u32::MAX);
        assert_eq!(request.limit, state.page_size);
    }

    #[test]
    fn test_stale_apply_after_filter_change_is_dropped() {
        let mut state = loaded_state();
        let stale = state.request_context();
        reduce(
            &mut state,
            Action::SetFilters {
                filters: Filters {
                    search_term: "cat".into(),
                    ..Filters::default()
                },
            },
        )
        .unwrap();
        select_first_two(&mut state, "a");
        let before = state.clone();

        reduce(
            &mut state,
            Action::TokenApply {
                context: stale,
                focus_token_id: TokenId::new("a-0"),
                replacement: "the".into(),
                response: TokenMutationResponse {
                    text_token_ids: [(TextId::new("a"), vec![TokenId::new("a-0")])].into(),
                    matches: 1,
                },
            },
        )
        .unwrap();

        assert_eq!(state, before);
        assert!(state.toast.is_none());
        assert_eq!(state.text(&TextId::new("a")).unwrap().tokens[0].current_value, "teh");
    }

    #[test]
    fn test_stale_structural_edit_after_page_change_is_dropped() {
        let mut state = loaded_state();
        let stale = state.request_context();
        reduce(&mut state, Action::SetPage { page: 2 }).unwrap();
        select_first_two(&mut state, "a");
        let a_before = Arc::clone(state.text(&TextId::new("a")).unwrap());
        let selection_before = state.selection.clone();

        for action in [
            Action::Tokenize {
                context: stale.clone(),
                response: StructuralEditResponse {
                    texts: vec![sample_text("a", &["tehcat"])],
                    matches: 1,
                },
            },
            Action::TokenSplit {
                context: stale.clone(),
                response: StructuralEditResponse {
                    texts: vec![sample_text("a", &["te", "h", "cat"])],
                    matches: 1,
                },
            },
        ] {
            reduce(&mut state, action).unwrap();
        }

        assert!(Arc::ptr_eq(&a_before, state.text(&TextId::new("a")).unwrap()));
        assert_eq!(state.selection, selection_before);
        assert!(state.toast.is_none());
        assert!(!state.show_toast);
    }

    #[test]
    fn test_set_project_id_keeps_loaded_texts() {
        let mut state = loaded_state();
        let a_before = Arc::clone(state.text(&TextId::new("a")).unwrap());
        let old_context = state.request_context();

        reduce(
            &mut state,
            Action::SetProjectId {
                project_id: ProjectId::new("p2"),
            },
        )
        .unwrap();

        assert_ne!(state.request_context(), old_context);
        assert_eq!(state.texts.as_ref().map(|t| t.len()), Some(2));
        assert!(Arc::ptr_eq(&a_before, state.text(&TextId::new("a")).unwrap()));
    }

    fn select_first_two(state: &mut AnnotationState, text_id: &str) {
        let text_id = TextId::new(text_id);
        reduce(
            state,
            Action::SelectionStart {
                text_id: text_id.clone(),
                index: 0,
            },
        )
        .unwrap();
        reduce(state, Action::SelectionEnd { text_id, index: 1 }).unwrap();
    }
}
