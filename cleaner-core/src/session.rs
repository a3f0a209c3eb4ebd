//! Request → confirm → dispatch
//!
//! The free functions issue one request each and turn the server's answer
//! into the store action to dispatch. They never touch state, so a UI can
//! hold its state in whatever container it likes and dispatch afterwards.
//! [`Session`] bundles an API client and a state for native callers.

use shared_types::{
    ApplyTokenRequest, FilterTextsRequest, ProjectId, RemoveTokenRequest, SaveTextsRequest,
    SplitTokenRequest, TextId, TokenId, TokenScopeRequest, TokenizeRequest,
};

use crate::api::{AnnotationApi, ApiError};
use crate::error::StoreError;
use crate::grouping::IndexGroups;
use crate::store::{reduce, Action, AnnotationState, RequestContext};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("selection cannot be tokenized: {0:?}")]
    InvalidGrouping(Vec<Vec<u32>>),

    #[error("no text has an active selection")]
    NoActiveText,

    #[error("no project selected")]
    NoProject,

    #[error("token {token_id} is not loaded in text {text_id}")]
    UnknownToken { text_id: TextId, token_id: TokenId },
}

fn logged<T>(endpoint: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(e) = &result {
        tracing::warn!(endpoint, error = %e, "Annotation API request failed; state unchanged");
    }
    result
}

pub async fn load_project<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    project_id: &ProjectId,
) -> Result<Action, ApiError> {
    let project = logged("project", api.fetch_project(project_id).await)?;
    Ok(Action::SetProject { context, project })
}

pub async fn load_texts<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: &FilterTextsRequest,
) -> Result<Action, ApiError> {
    let page = logged("text/filter", api.filter_texts(request).await)?;
    tracing::debug!(
        count = page.texts.len(),
        total = page.total_count,
        "Fetched page of texts"
    );
    Ok(Action::SetTexts { context, page })
}

pub async fn load_progress<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    project_id: &ProjectId,
) -> Result<Action, ApiError> {
    let progress = logged("project/progress", api.fetch_progress(project_id).await)?;
    Ok(Action::SetProgress { context, progress })
}

pub async fn apply_token<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: ApplyTokenRequest,
) -> Result<Action, ApiError> {
    let response = logged("token/add", api.apply_token(&request).await)?;
    Ok(Action::TokenApply {
        context,
        focus_token_id: request.token_id,
        replacement: request.replacement,
        response,
    })
}

pub async fn delete_token<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: TokenScopeRequest,
) -> Result<Action, ApiError> {
    let response = logged("token/delete", api.delete_token(&request).await)?;
    Ok(Action::TokenDelete {
        context,
        focus_token_id: request.token_id,
        response,
    })
}

pub async fn accept_token<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: TokenScopeRequest,
) -> Result<Action, ApiError> {
    let response = logged("token/accept", api.accept_token(&request).await)?;
    Ok(Action::TokenAccept {
        context,
        focus_token_id: request.token_id,
        response,
    })
}

pub async fn split_token<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: SplitTokenRequest,
) -> Result<Action, ApiError> {
    let response = logged("token/split", api.split_token(&request).await)?;
    Ok(Action::TokenSplit { context, response })
}

pub async fn remove_token<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: RemoveTokenRequest,
) -> Result<Action, ApiError> {
    let response = logged("token/remove", api.remove_token(&request).await)?;
    Ok(Action::TokenRemove { context, response })
}

pub async fn tokenize<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: TokenizeRequest,
) -> Result<Action, ApiError> {
    let response = logged("text/tokenize", api.tokenize(&request).await)?;
    Ok(Action::Tokenize { context, response })
}

pub async fn save_texts<A: AnnotationApi + ?Sized>(
    api: &A,
    context: RequestContext,
    request: SaveTextsRequest,
) -> Result<Action, ApiError> {
    logged("text/save", api.save_texts(&request).await)?;
    Ok(Action::SaveTexts {
        context,
        text_ids: request.text_ids,
        saved: request.saved,
    })
}

/// Build a tokenize request from the current selection.
pub fn tokenize_request(state: &AnnotationState) -> Result<TokenizeRequest, SessionError> {
    let text_id = state
        .selection
        .text_id
        .clone()
        .ok_or(SessionError::NoActiveText)?;
    let IndexGroups { groups, valid } = state.selection.index_groups();
    if !valid {
        return Err(SessionError::InvalidGrouping(groups));
    }
    Ok(TokenizeRequest {
        text_id,
        index_groups: groups,
    })
}

/// An API client and the state of one annotation page.
pub struct Session<A> {
    api: A,
    state: AnnotationState,
}

impl<A: AnnotationApi> Session<A> {
    pub fn new(api: A, state: AnnotationState) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        reduce(&mut self.state, action)
    }

    fn project_id(&self) -> Result<ProjectId, SessionError> {
        self.state.project_id.clone().ok_or(SessionError::NoProject)
    }

    /// Select a project and load it with its first page and progress.
    pub async fn open_project(&mut self, project_id: ProjectId) -> Result<(), SessionError> {
        self.dispatch(Action::SetProjectId {
            project_id: project_id.clone(),
        })?;

        let action = load_project(&self.api, self.state.request_context(), &project_id).await?;
        self.dispatch(action)?;

        self.refresh_texts().await?;
        self.refresh_progress().await
    }

    pub async fn refresh_texts(&mut self) -> Result<(), SessionError> {
        let request = self.state.filter_request().ok_or(SessionError::NoProject)?;
        let action = load_texts(&self.api, self.state.request_context(), &request).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn refresh_progress(&mut self) -> Result<(), SessionError> {
        let project_id = self.project_id()?;
        let action = load_progress(&self.api, self.state.request_context(), &project_id).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn change_page(&mut self, page: u32) -> Result<(), SessionError> {
        self.dispatch(Action::SetPage { page })?;
        self.refresh_texts().await
    }

    pub async fn set_filters(&mut self, filters: shared_types::Filters) -> Result<(), SessionError> {
        self.dispatch(Action::SetFilters { filters })?;
        self.refresh_texts().await
    }

    pub async fn reset_filters(&mut self) -> Result<(), SessionError> {
        self.dispatch(Action::ResetFilters)?;
        self.refresh_texts().await
    }

    pub async fn apply_replacement(
        &mut self,
        text_id: &TextId,
        token_id: &TokenId,
        replacement: &str,
        apply_all: bool,
    ) -> Result<(), SessionError> {
        let request = self
            .state
            .apply_request(text_id, token_id, replacement, apply_all);
        let action = apply_token(&self.api, self.state.request_context(), request).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn delete_replacement(
        &mut self,
        text_id: &TextId,
        token_id: &TokenId,
        apply_all: bool,
    ) -> Result<(), SessionError> {
        let request = self.state.scope_request(text_id, token_id, apply_all);
        let action = delete_token(&self.api, self.state.request_context(), request).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn accept_suggestion(
        &mut self,
        text_id: &TextId,
        token_id: &TokenId,
        apply_all: bool,
    ) -> Result<(), SessionError> {
        let request = self.state.scope_request(text_id, token_id, apply_all);
        let action = accept_token(&self.api, self.state.request_context(), request).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn split(&mut self, text_id: &TextId, token_id: &TokenId) -> Result<(), SessionError> {
        let request = self
            .state
            .split_request(text_id, token_id)
            .ok_or_else(|| SessionError::UnknownToken {
                text_id: text_id.clone(),
                token_id: token_id.clone(),
            })?;
        let action = split_token(&self.api, self.state.request_context(), request).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn remove(
        &mut self,
        text_id: &TextId,
        token_id: &TokenId,
        apply_all: bool,
    ) -> Result<(), SessionError> {
        let request = self
            .state
            .remove_request(text_id, token_id, apply_all)
            .ok_or_else(|| SessionError::UnknownToken {
                text_id: text_id.clone(),
                token_id: token_id.clone(),
            })?;
        let action = remove_token(&self.api, self.state.request_context(), request).await?;
        Ok(self.dispatch(action)?)
    }

    /// Merge the selected index runs of the active text.
    pub async fn tokenize_selection(&mut self) -> Result<(), SessionError> {
        let request = tokenize_request(&self.state)?;
        let action = tokenize(&self.api, self.state.request_context(), request).await?;
        Ok(self.dispatch(action)?)
    }

    pub async fn save(&mut self, text_ids: Vec<TextId>, saved: bool) -> Result<(), SessionError> {
        let request = self.state.save_request(text_ids, saved);
        let action = save_texts(&self.api, self.state.request_context(), request).await?;
        self.dispatch(action)?;
        self.refresh_progress().await
    }
}

#[cfg(feature = "http")]
impl Session<crate::http::HttpAnnotationApi> {
    /// Session against the configured server. Loads `.env` first so it can
    /// feed the config overrides.
    pub fn from_environment() -> Self {
        crate::config::load_env_file();
        let config = crate::config::load_config();
        tracing::info!(
            api_base = %config.api_base,
            page_size = config.page_size,
            "Starting cleaner session"
        );
        Self::new(
            crate::http::HttpAnnotationApi::from_config(&config),
            AnnotationState::from_config(&config),
        )
    }
}
