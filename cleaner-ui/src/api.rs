use async_trait::async_trait;
use cleaner_core::{AnnotationApi, ApiError};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    ApplyTokenRequest, FilterTextsRequest, Project, ProjectId, ProjectProgress,
    RemoveTokenRequest, SaveTextsRequest, SplitTokenRequest, StructuralEditResponse, TextPage,
    TokenMutationResponse, TokenScopeRequest, TokenizeRequest, PATH_PROJECT,
    PATH_PROJECT_PROGRESS, PATH_TEXT_FILTER, PATH_TEXT_SAVE, PATH_TEXT_TOKENIZE,
    PATH_TOKEN_ACCEPT, PATH_TOKEN_ADD, PATH_TOKEN_DELETE, PATH_TOKEN_REMOVE, PATH_TOKEN_SPLIT,
};
use std::sync::OnceLock;

/// Get the API base URL based on current environment
/// - In development (localhost): use http://localhost:8080
/// - In production: use same origin (API serves static files)
fn get_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:8080".to_string()
    } else {
        "".to_string()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

/// Browser client for the annotation API
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlooAnnotationApi;

impl GlooAnnotationApi {
    fn url(path: &str) -> String {
        format!("{}{}", api_base(), path)
    }

    async fn get<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
        let response = Request::get(&Self::url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(path, response).await
    }

    async fn send<B, T>(builder: RequestBuilder, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = builder
            .json(body)
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(path, response).await
    }

    async fn patch<B, T>(path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::send(Request::patch(&Self::url(path)), path, body).await
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ApiError> {
    ensure_ok(endpoint, &response)?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn ensure_ok(endpoint: &str, response: &Response) -> Result<(), ApiError> {
    if !response.ok() {
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: response.status(),
        });
    }
    Ok(())
}

#[async_trait(?Send)]
impl AnnotationApi for GlooAnnotationApi {
    async fn fetch_project(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        Self::get(&format!("{PATH_PROJECT}/{project_id}")).await
    }

    async fn filter_texts(&self, request: &FilterTextsRequest) -> Result<TextPage, ApiError> {
        Self::send(Request::post(&Self::url(PATH_TEXT_FILTER)), PATH_TEXT_FILTER, request).await
    }

    async fn fetch_progress(&self, project_id: &ProjectId) -> Result<ProjectProgress, ApiError> {
        Self::get(&format!("{PATH_PROJECT_PROGRESS}/{project_id}")).await
    }

    async fn apply_token(
        &self,
        request: &ApplyTokenRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        Self::patch(PATH_TOKEN_ADD, request).await
    }

    async fn delete_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        Self::patch(PATH_TOKEN_DELETE, request).await
    }

    async fn accept_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        Self::patch(PATH_TOKEN_ACCEPT, request).await
    }

    async fn split_token(
        &self,
        request: &SplitTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError> {
        Self::patch(PATH_TOKEN_SPLIT, request).await
    }

    async fn remove_token(
        &self,
        request: &RemoveTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError> {
        Self::patch(PATH_TOKEN_REMOVE, request).await
    }

    async fn tokenize(&self, request: &TokenizeRequest) -> Result<StructuralEditResponse, ApiError> {
        Self::patch(PATH_TEXT_TOKENIZE, request).await
    }

    async fn save_texts(&self, request: &SaveTextsRequest) -> Result<(), ApiError> {
        let response = Request::patch(&Self::url(PATH_TEXT_SAVE))
            .json(request)
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        ensure_ok(PATH_TEXT_SAVE, &response)
    }
}
