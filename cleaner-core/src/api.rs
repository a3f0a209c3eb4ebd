//! Boundary to the annotation REST API

use async_trait::async_trait;
use shared_types::{
    ApplyTokenRequest, FilterTextsRequest, Project, ProjectId, ProjectProgress,
    RemoveTokenRequest, SaveTextsRequest, SplitTokenRequest, StructuralEditResponse, TextPage,
    TokenMutationResponse, TokenScopeRequest, TokenizeRequest,
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error from {endpoint}: {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Failed to parse JSON: {0}")]
    Decode(String),
}

/// The endpoints the cleaner talks to.
///
/// `?Send` so the browser client, whose futures are single-threaded, can
/// implement it alongside the native one.
#[async_trait(?Send)]
pub trait AnnotationApi {
    /// `GET /api/project/:projectId`
    async fn fetch_project(&self, project_id: &ProjectId) -> Result<Project, ApiError>;

    /// `POST /api/text/filter`
    async fn filter_texts(&self, request: &FilterTextsRequest) -> Result<TextPage, ApiError>;

    /// `GET /api/project/progress/:projectId`
    async fn fetch_progress(&self, project_id: &ProjectId) -> Result<ProjectProgress, ApiError>;

    /// `PATCH /api/token/add`
    async fn apply_token(
        &self,
        request: &ApplyTokenRequest,
    ) -> Result<TokenMutationResponse, ApiError>;

    /// `PATCH /api/token/delete`
    async fn delete_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError>;

    /// `PATCH /api/token/accept`
    async fn accept_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError>;

    /// `PATCH /api/token/split`
    async fn split_token(
        &self,
        request: &SplitTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError>;

    /// `PATCH /api/token/remove`
    async fn remove_token(
        &self,
        request: &RemoveTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError>;

    /// `PATCH /api/text/tokenize`
    async fn tokenize(&self, request: &TokenizeRequest) -> Result<StructuralEditResponse, ApiError>;

    /// `PATCH /api/text/save`
    async fn save_texts(&self, request: &SaveTextsRequest) -> Result<(), ApiError>;
}
