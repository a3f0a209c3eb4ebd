//! Native `AnnotationApi` client over reqwest

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    ApplyTokenRequest, FilterTextsRequest, Project, ProjectId, ProjectProgress,
    RemoveTokenRequest, SaveTextsRequest, SplitTokenRequest, StructuralEditResponse, TextPage,
    TokenMutationResponse, TokenScopeRequest, TokenizeRequest, PATH_PROJECT,
    PATH_PROJECT_PROGRESS, PATH_TEXT_FILTER, PATH_TEXT_SAVE, PATH_TEXT_TOKENIZE,
    PATH_TOKEN_ACCEPT, PATH_TOKEN_ADD, PATH_TOKEN_DELETE, PATH_TOKEN_REMOVE, PATH_TOKEN_SPLIT,
};

use crate::api::{AnnotationApi, ApiError};
use crate::config::CleanerConfig;

#[derive(Debug, Clone)]
pub struct HttpAnnotationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnnotationApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(config.api_base.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(path, response).await
    }

    async fn send<B, T>(&self, method: reqwest::Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(path, response).await
    }

    async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(reqwest::Method::PATCH, path, body).await
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    ensure_success(endpoint, &response)?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn ensure_success(endpoint: &str, response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[async_trait(?Send)]
impl AnnotationApi for HttpAnnotationApi {
    async fn fetch_project(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        self.get(&format!("{PATH_PROJECT}/{project_id}")).await
    }

    async fn filter_texts(&self, request: &FilterTextsRequest) -> Result<TextPage, ApiError> {
        self.send(reqwest::Method::POST, PATH_TEXT_FILTER, request)
            .await
    }

    async fn fetch_progress(&self, project_id: &ProjectId) -> Result<ProjectProgress, ApiError> {
        self.get(&format!("{PATH_PROJECT_PROGRESS}/{project_id}"))
            .await
    }

    async fn apply_token(
        &self,
        request: &ApplyTokenRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        self.patch(PATH_TOKEN_ADD, request).await
    }

    async fn delete_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        self.patch(PATH_TOKEN_DELETE, request).await
    }

    async fn accept_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        self.patch(PATH_TOKEN_ACCEPT, request).await
    }

    async fn split_token(
        &self,
        request: &SplitTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError> {
        self.patch(PATH_TOKEN_SPLIT, request).await
    }

    async fn remove_token(
        &self,
        request: &RemoveTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError> {
        self.patch(PATH_TOKEN_REMOVE, request).await
    }

    async fn tokenize(&self, request: &TokenizeRequest) -> Result<StructuralEditResponse, ApiError> {
        self.patch(PATH_TEXT_TOKENIZE, request).await
    }

    async fn save_texts(&self, request: &SaveTextsRequest) -> Result<(), ApiError> {
        // the body is an acknowledgement only, possibly empty
        let response = self
            .client
            .patch(self.url(PATH_TEXT_SAVE))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        ensure_success(PATH_TEXT_SAVE, &response)
    }
}
