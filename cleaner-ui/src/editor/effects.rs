use std::future::Future;

use cleaner_core::session;
use cleaner_core::{Action, ApiError};
use dioxus::prelude::{ReadableExt, WritableExt};
use shared_types::{Filters, ProjectId, TextId, TokenId};

use crate::api::GlooAnnotationApi;
use crate::editor::state::EditorStore;

async fn confirm(store: EditorStore, request: impl Future<Output = Result<Action, ApiError>>) -> bool {
    match request.await {
        Ok(action) => {
            store.dispatch(action);
            true
        }
        Err(e) => {
            store.report(&e);
            false
        }
    }
}

pub async fn open_project(store: EditorStore, project_id: ProjectId) {
    store.dispatch(Action::SetProjectId {
        project_id: project_id.clone(),
    });

    let context = store.state.read().request_context();
    if !confirm(store, session::load_project(&GlooAnnotationApi, context, &project_id)).await {
        return;
    }

    load_texts(store).await;
    load_progress(store).await;
}

pub async fn load_texts(store: EditorStore) {
    let (context, request) = {
        let state = store.state.read();
        (state.request_context(), state.filter_request())
    };
    let Some(request) = request else {
        return;
    };
    confirm(store, session::load_texts(&GlooAnnotationApi, context, &request)).await;
}

pub async fn load_progress(store: EditorStore) {
    let (context, project_id) = {
        let state = store.state.read();
        (state.request_context(), state.project_id.clone())
    };
    let Some(project_id) = project_id else {
        return;
    };
    confirm(store, session::load_progress(&GlooAnnotationApi, context, &project_id)).await;
}

pub async fn change_page(store: EditorStore, page: u32) {
    store.dispatch(Action::SetPage { page });
    load_texts(store).await;
}

pub async fn set_filters(store: EditorStore, filters: Filters) {
    store.dispatch(Action::SetFilters { filters });
    load_texts(store).await;
}

pub async fn reset_filters(store: EditorStore) {
    store.dispatch(Action::ResetFilters);
    load_texts(store).await;
}

pub async fn apply_replacement(
    store: EditorStore,
    text_id: TextId,
    token_id: TokenId,
    replacement: String,
    apply_all: bool,
) {
    let (context, request) = {
        let state = store.state.read();
        (
            state.request_context(),
            state.apply_request(&text_id, &token_id, replacement, apply_all),
        )
    };
    confirm(store, session::apply_token(&GlooAnnotationApi, context, request)).await;
}

pub async fn delete_replacement(store: EditorStore, text_id: TextId, token_id: TokenId, apply_all: bool) {
    let (context, request) = {
        let state = store.state.read();
        (
            state.request_context(),
            state.scope_request(&text_id, &token_id, apply_all),
        )
    };
    confirm(store, session::delete_token(&GlooAnnotationApi, context, request)).await;
}

pub async fn accept_suggestion(store: EditorStore, text_id: TextId, token_id: TokenId, apply_all: bool) {
    let (context, request) = {
        let state = store.state.read();
        (
            state.request_context(),
            state.scope_request(&text_id, &token_id, apply_all),
        )
    };
    confirm(store, session::accept_token(&GlooAnnotationApi, context, request)).await;
}

pub async fn split_token(store: EditorStore, text_id: TextId, token_id: TokenId) {
    let (context, request) = {
        let state = store.state.read();
        (state.request_context(), state.split_request(&text_id, &token_id))
    };
    let Some(request) = request else {
        dioxus_logger::tracing::warn!("Split requested for unloaded token {}", token_id);
        return;
    };
    confirm(store, session::split_token(&GlooAnnotationApi, context, request)).await;
}

pub async fn remove_token(store: EditorStore, text_id: TextId, token_id: TokenId, apply_all: bool) {
    let (context, request) = {
        let state = store.state.read();
        (
            state.request_context(),
            state.remove_request(&text_id, &token_id, apply_all),
        )
    };
    let Some(request) = request else {
        dioxus_logger::tracing::warn!("Remove requested for unloaded token {}", token_id);
        return;
    };
    confirm(store, session::remove_token(&GlooAnnotationApi, context, request)).await;
}

pub async fn tokenize_selection(mut store: EditorStore) {
    let (context, request) = {
        let state = store.state.read();
        (state.request_context(), session::tokenize_request(&state))
    };
    match request {
        Ok(request) => {
            confirm(store, session::tokenize(&GlooAnnotationApi, context, request)).await;
        }
        Err(e) => {
            store.notice.set(Some(e.to_string()));
        }
    }
}

pub async fn save_texts(store: EditorStore, text_ids: Vec<TextId>, saved: bool) {
    let (context, request) = {
        let state = store.state.read();
        (state.request_context(), state.save_request(text_ids, saved))
    };
    if confirm(store, session::save_texts(&GlooAnnotationApi, context, request)).await {
        load_progress(store).await;
    }
}
