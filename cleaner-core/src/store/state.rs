use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared_types::{
    ApplyTokenRequest, FilterTextsRequest, Filters, Project, ProjectId, ProjectProgress,
    RemoveTokenRequest, SaveTextsRequest, SplitTokenRequest, Text, TextId, TokenId,
    TokenScopeRequest,
};

use crate::config::CleanerConfig;
use crate::mutation::Texts;
use crate::selection::Selection;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Where a request was issued from. Responses whose context no longer
/// matches the store are stale and get dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub project_id: Option<ProjectId>,
    pub page: u32,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Apply,
    Delete,
    Accept,
    Split,
    Remove,
    Tokenize,
}

/// Feedback about the last token operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastInfo {
    pub kind: ToastKind,
    pub content: String,
    pub count: u32,
}

/// State of one annotation page
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationState {
    pub project_id: Option<ProjectId>,
    pub project: Option<Project>,
    pub project_loading: bool,
    pub texts: Option<Texts>,
    pub texts_loading: bool,
    pub total_texts: u32,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub filters: Filters,
    pub default_filters: Filters,
    pub progress: Option<ProjectProgress>,
    pub toast: Option<ToastInfo>,
    pub show_toast: bool,
    /// Bumped for every toast raised, so a view can tell two toasts apart
    pub toast_seq: u64,
    pub selection: Selection,
    pub(crate) generation: u64,
}

impl Default for AnnotationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, Filters::default())
    }
}

impl AnnotationState {
    pub fn new(page_size: u32, default_filters: Filters) -> Self {
        Self {
            project_id: None,
            project: None,
            project_loading: true,
            texts: None,
            texts_loading: true,
            total_texts: 0,
            page: 1,
            page_size: page_size.max(1),
            filters: default_filters.clone(),
            default_filters,
            progress: None,
            toast: None,
            show_toast: false,
            toast_seq: 0,
            selection: Selection::default(),
            generation: 0,
        }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(config.page_size, config.default_filters.clone())
    }

    /// Initial state for the same project, page size and defaults. The
    /// generation keeps counting so older responses stay stale.
    pub(crate) fn reset_keeping_project(&mut self) {
        let mut fresh = Self::new(self.page_size, self.default_filters.clone());
        fresh.project_id = self.project_id.take();
        fresh.generation = self.generation;
        fresh.toast_seq = self.toast_seq;
        *self = fresh;
    }

    pub(crate) fn raise_toast(&mut self, toast: ToastInfo) {
        self.toast = Some(toast);
        self.show_toast = true;
        self.toast_seq = self.toast_seq.wrapping_add(1);
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext {
            project_id: self.project_id.clone(),
            page: self.page,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, context: &RequestContext) -> bool {
        context.generation == self.generation
            && context.page == self.page
            && context.project_id == self.project_id
    }

    pub fn text(&self, text_id: &TextId) -> Option<&Arc<Text>> {
        self.texts.as_ref().and_then(|texts| texts.get(text_id))
    }

    /// Loaded texts in page order.
    pub fn text_ids(&self) -> Vec<TextId> {
        self.texts
            .as_ref()
            .map(|texts| texts.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn page_count(&self) -> u32 {
        self.total_texts.div_ceil(self.page_size)
    }

    pub fn filter_request(&self) -> Option<FilterTextsRequest> {
        let project_id = self.project_id.clone()?;
        Some(FilterTextsRequest::new(
            project_id,
            &self.filters,
            self.page,
            self.page_size,
        ))
    }

    pub fn apply_request(
        &self,
        text_id: &TextId,
        token_id: &TokenId,
        replacement: impl Into<String>,
        apply_all: bool,
    ) -> ApplyTokenRequest {
        ApplyTokenRequest {
            token_id: token_id.clone(),
            text_id: text_id.clone(),
            replacement: replacement.into(),
            apply_all,
            text_ids: self.text_ids(),
        }
    }

    pub fn scope_request(
        &self,
        text_id: &TextId,
        token_id: &TokenId,
        apply_all: bool,
    ) -> TokenScopeRequest {
        TokenScopeRequest {
            token_id: token_id.clone(),
            text_id: text_id.clone(),
            apply_all,
            text_ids: self.text_ids(),
        }
    }

    /// `None` when the token is not loaded.
    pub fn split_request(&self, text_id: &TextId, token_id: &TokenId) -> Option<SplitTokenRequest> {
        let token = self.text(text_id)?.token(token_id)?;
        Some(SplitTokenRequest {
            text_id: text_id.clone(),
            token_id: token_id.clone(),
            token_index: token.index,
            current_value: token.current_value.clone(),
        })
    }

    pub fn remove_request(
        &self,
        text_id: &TextId,
        token_id: &TokenId,
        apply_all: bool,
    ) -> Option<RemoveTokenRequest> {
        let token = self.text(text_id)?.token(token_id)?;
        Some(RemoveTokenRequest {
            text_id: text_id.clone(),
            token_id: token_id.clone(),
            token_index: token.index,
            apply_all,
            text_ids: self.text_ids(),
        })
    }

    pub fn save_request(&self, text_ids: Vec<TextId>, saved: bool) -> SaveTextsRequest {
        SaveTextsRequest { text_ids, saved }
    }
}
