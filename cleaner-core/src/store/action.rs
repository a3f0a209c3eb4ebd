use serde::{Deserialize, Serialize};
use shared_types::{
    Filters, Project, ProjectId, ProjectProgress, StructuralEditResponse, TextId, TextPage,
    TokenId, TokenMutationResponse,
};

use crate::error::StoreError;
use crate::store::state::RequestContext;

/// Every action the store understands.
///
/// Variants that carry a [`RequestContext`] hold server-confirmed payloads and
/// are dropped when the context has gone stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    #[serde(rename = "SET_PROJECTID")]
    SetProjectId { project_id: ProjectId },
    SetProject {
        context: RequestContext,
        project: Project,
    },
    SetTexts {
        context: RequestContext,
        page: TextPage,
    },
    SetPage { page: u32 },
    SetFilters { filters: Filters },
    ResetFilters,
    SetProgress {
        context: RequestContext,
        progress: ProjectProgress,
    },
    SaveTexts {
        context: RequestContext,
        text_ids: Vec<TextId>,
        saved: bool,
    },
    UpdateTokenValue {
        text_id: TextId,
        token_id: TokenId,
        value: String,
    },
    TokenApply {
        context: RequestContext,
        focus_token_id: TokenId,
        replacement: String,
        response: TokenMutationResponse,
    },
    TokenDelete {
        context: RequestContext,
        focus_token_id: TokenId,
        response: TokenMutationResponse,
    },
    TokenAccept {
        context: RequestContext,
        focus_token_id: TokenId,
        response: TokenMutationResponse,
    },
    TokenSplit {
        context: RequestContext,
        response: StructuralEditResponse,
    },
    TokenRemove {
        context: RequestContext,
        response: StructuralEditResponse,
    },
    Tokenize {
        context: RequestContext,
        response: StructuralEditResponse,
    },
    SetShowToast { show: bool },
    SelectionStart { text_id: TextId, index: u32 },
    SelectionMove { text_id: TextId, index: u32 },
    SelectionEnd { text_id: TextId, index: u32 },
    SelectionCancel,
    ToggleTokenSelect { text_id: TextId, index: u32 },
    ClearSelection,
}

/// Wire names of every action, as used in the `type` field.
pub const ACTION_KINDS: &[&str] = &[
    "SET_PROJECTID",
    "SET_PROJECT",
    "SET_TEXTS",
    "SET_PAGE",
    "SET_FILTERS",
    "RESET_FILTERS",
    "SET_PROGRESS",
    "SAVE_TEXTS",
    "UPDATE_TOKEN_VALUE",
    "TOKEN_APPLY",
    "TOKEN_DELETE",
    "TOKEN_ACCEPT",
    "TOKEN_SPLIT",
    "TOKEN_REMOVE",
    "TOKENIZE",
    "SET_SHOW_TOAST",
    "SELECTION_START",
    "SELECTION_MOVE",
    "SELECTION_END",
    "SELECTION_CANCEL",
    "TOGGLE_TOKEN_SELECT",
    "CLEAR_SELECTION",
];

impl Action {
    /// Parse a `{"type": ..., "payload": ...}` envelope.
    pub fn from_json(value: serde_json::Value) -> Result<Self, StoreError> {
        let kind = value
            .get("type")
            .and_then(|kind| kind.as_str())
            .unwrap_or_default()
            .to_string();

        if !ACTION_KINDS.contains(&kind.as_str()) {
            return Err(StoreError::UnknownAction(kind));
        }

        serde_json::from_value(value).map_err(|e| StoreError::MalformedAction {
            kind,
            reason: e.to_string(),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetProjectId { .. } => "SET_PROJECTID",
            Self::SetProject { .. } => "SET_PROJECT",
            Self::SetTexts { .. } => "SET_TEXTS",
            Self::SetPage { .. } => "SET_PAGE",
            Self::SetFilters { .. } => "SET_FILTERS",
            Self::ResetFilters => "RESET_FILTERS",
            Self::SetProgress { .. } => "SET_PROGRESS",
            Self::SaveTexts { .. } => "SAVE_TEXTS",
            Self::UpdateTokenValue { .. } => "UPDATE_TOKEN_VALUE",
            Self::TokenApply { .. } => "TOKEN_APPLY",
            Self::TokenDelete { .. } => "TOKEN_DELETE",
            Self::TokenAccept { .. } => "TOKEN_ACCEPT",
            Self::TokenSplit { .. } => "TOKEN_SPLIT",
            Self::TokenRemove { .. } => "TOKEN_REMOVE",
            Self::Tokenize { .. } => "TOKENIZE",
            Self::SetShowToast { .. } => "SET_SHOW_TOAST",
            Self::SelectionStart { .. } => "SELECTION_START",
            Self::SelectionMove { .. } => "SELECTION_MOVE",
            Self::SelectionEnd { .. } => "SELECTION_END",
            Self::SelectionCancel => "SELECTION_CANCEL",
            Self::ToggleTokenSelect { .. } => "TOGGLE_TOKEN_SELECT",
            Self::ClearSelection => "CLEAR_SELECTION",
        }
    }

    /// Context of the request that produced a server-confirmed action.
    pub fn context(&self) -> Option<&RequestContext> {
        match self {
            Self::SetProject { context, .. }
            | Self::SetTexts { context, .. }
            | Self::SetProgress { context, .. }
            | Self::SaveTexts { context, .. }
            | Self::TokenApply { context, .. }
            | Self::TokenDelete { context, .. }
            | Self::TokenAccept { context, .. }
            | Self::TokenSplit { context, .. }
            | Self::TokenRemove { context, .. }
            | Self::Tokenize { context, .. } => Some(context),
            _ => None,
        }
    }
}
