//! Shared types between the cleaner core and the UI
//!
//! These types are used by both:
//! - The native core (reducer, session, reqwest client)
//! - Dioxus components (WASM)
//!
//! Serializable with serde for JSON over HTTP. Wire names are camelCase to
//! match the annotation API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Identifiers
// ============================================================================

/// Project identifier, assigned by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct ProjectId(pub String);

/// Text identifier, assigned by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TextId(pub String);

/// Token identifier, unique within its text and stable across edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TokenId(pub String);

macro_rules! id_impls {
    ($($name:ident),*) => {$(
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    )*};
}

id_impls!(ProjectId, TextId, TokenId);

// ============================================================================
// Tokens
// ============================================================================

/// Correction state of a token.
///
/// Precedence when resolving the displayed value is
/// `Confirmed > Suggested > Original`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenState {
    /// No correction recorded
    #[default]
    Original,
    /// Correction propagated from another token, not yet accepted
    Suggested(String),
    /// Correction confirmed by an annotator
    Confirmed(String),
}

impl TokenState {
    /// Build a state from the nullable wire pair. A replacement always wins.
    pub fn from_fields(replacement: Option<String>, suggestion: Option<String>) -> Self {
        match (replacement, suggestion) {
            (Some(replacement), _) => Self::Confirmed(replacement),
            (None, Some(suggestion)) => Self::Suggested(suggestion),
            (None, None) => Self::Original,
        }
    }

    pub fn replacement(&self) -> Option<&str> {
        match self {
            Self::Confirmed(value) => Some(value),
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Suggested(value) => Some(value),
            _ => None,
        }
    }
}

/// One editable unit of a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TokenRecord", into = "TokenRecord")]
pub struct Token {
    pub id: TokenId,
    pub index: u32,
    /// Original token text, never edited
    pub value: String,
    /// Value currently displayed in the editor
    pub current_value: String,
    pub state: TokenState,
    pub tags: BTreeMap<String, bool>,
}

impl Token {
    pub fn new(id: impl Into<TokenId>, index: u32, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            index,
            current_value: value.clone(),
            value,
            state: TokenState::Original,
            tags: BTreeMap::new(),
        }
    }

    pub fn replacement(&self) -> Option<&str> {
        self.state.replacement()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.state.suggestion()
    }

    /// Value the token resolves to under the precedence rule.
    pub fn resolved_value(&self) -> &str {
        match &self.state {
            TokenState::Confirmed(value) | TokenState::Suggested(value) => value,
            TokenState::Original => &self.value,
        }
    }

    /// True when the displayed value differs from the original.
    pub fn is_modified(&self) -> bool {
        self.current_value != self.value
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<String> for TextId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Wire shape of a token, with nullable `replacement` and `suggestion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TokenRecord {
    pub id: TokenId,
    pub index: u32,
    pub value: String,
    pub current_value: String,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, bool>,
}

impl From<TokenRecord> for Token {
    fn from(record: TokenRecord) -> Self {
        Self {
            id: record.id,
            index: record.index,
            value: record.value,
            current_value: record.current_value,
            state: TokenState::from_fields(record.replacement, record.suggestion),
            tags: record.tags,
        }
    }
}

impl From<Token> for TokenRecord {
    fn from(token: Token) -> Self {
        let (replacement, suggestion) = match token.state {
            TokenState::Original => (None, None),
            TokenState::Suggested(value) => (None, Some(value)),
            TokenState::Confirmed(value) => (Some(value), None),
        };
        Self {
            id: token.id,
            index: token.index,
            value: token.value,
            current_value: token.current_value,
            replacement,
            suggestion,
            tags: token.tags,
        }
    }
}

// ============================================================================
// Texts
// ============================================================================

/// One document or sentence under annotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct Text {
    pub id: TextId,
    #[ts(type = "Array<TokenRecord>")]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub original: String,
}

impl Text {
    pub fn token(&self, token_id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.id == token_id)
    }

    pub fn token_at(&self, index: u32) -> Option<&Token> {
        self.tokens.iter().find(|t| t.index == index)
    }

    /// Token indices run `0..len` in storage order.
    pub fn has_contiguous_indices(&self) -> bool {
        self.tokens
            .iter()
            .enumerate()
            .all(|(pos, token)| token.index as usize == pos)
    }

    /// Current values joined by single spaces.
    pub fn current_text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.current_value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parallel_corpus: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate save progress of a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct ProjectProgress {
    pub saved: u32,
    pub total: u32,
}

impl ProjectProgress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.saved) * 100.0 / f64::from(self.total)
    }
}

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub enum SavedFilter {
    #[default]
    All,
    Yes,
    No,
}

/// Sort direction, `1` or `-1` on the wire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "i8", into = "i8")]
pub enum SortRank {
    #[default]
    Ascending,
    Descending,
}

impl TryFrom<i8> for SortRank {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            -1 => Ok(Self::Descending),
            other => Err(format!("sort rank must be 1 or -1, got {other}")),
        }
    }
}

impl From<SortRank> for i8 {
    fn from(rank: SortRank) -> Self {
        match rank {
            SortRank::Ascending => 1,
            SortRank::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct Filters {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub reference_search_term: String,
    #[serde(default)]
    pub saved: SavedFilter,
    #[serde(default)]
    #[ts(type = "1 | -1")]
    pub rank: SortRank,
}

// ============================================================================
// API Types
// ============================================================================

/// `POST /api/text/filter`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct FilterTextsRequest {
    pub project_id: ProjectId,
    pub search_term: String,
    pub reference_search_term: String,
    pub saved: SavedFilter,
    #[ts(type = "1 | -1")]
    pub rank: SortRank,
    pub skip: u32,
    pub limit: u32,
}

impl FilterTextsRequest {
    /// Request for a 1-based `page` of `page_size` texts.
    pub fn new(project_id: ProjectId, filters: &Filters, page: u32, page_size: u32) -> Self {
        Self {
            project_id,
            search_term: filters.search_term.clone(),
            reference_search_term: filters.reference_search_term.clone(),
            saved: filters.saved,
            rank: filters.rank,
            skip: page.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

/// One page of texts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TextPage {
    pub texts: Vec<Text>,
    pub total_count: u32,
}

/// `PATCH /api/token/add`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct ApplyTokenRequest {
    pub token_id: TokenId,
    pub text_id: TextId,
    pub replacement: String,
    pub apply_all: bool,
    pub text_ids: Vec<TextId>,
}

/// `PATCH /api/token/delete` and `PATCH /api/token/accept`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TokenScopeRequest {
    pub token_id: TokenId,
    pub text_id: TextId,
    pub apply_all: bool,
    pub text_ids: Vec<TextId>,
}

/// `PATCH /api/token/split`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct SplitTokenRequest {
    pub text_id: TextId,
    pub token_id: TokenId,
    pub token_index: u32,
    pub current_value: String,
}

/// `PATCH /api/token/remove`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct RemoveTokenRequest {
    pub text_id: TextId,
    pub token_id: TokenId,
    pub token_index: u32,
    pub apply_all: bool,
    pub text_ids: Vec<TextId>,
}

/// `PATCH /api/text/tokenize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TokenizeRequest {
    pub text_id: TextId,
    /// Contiguous index runs, each of length two or more
    #[serde(rename = "indexGroupsTC")]
    pub index_groups: Vec<Vec<u32>>,
}

/// `PATCH /api/text/save`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct SaveTextsRequest {
    pub text_ids: Vec<TextId>,
    pub saved: bool,
}

/// Server confirmation of an apply/delete/accept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct TokenMutationResponse {
    /// Token ids the server updated, per text
    pub text_token_ids: BTreeMap<TextId, Vec<TokenId>>,
    #[serde(default)]
    pub matches: u32,
}

/// Server result of a split/remove/tokenize: the renumbered texts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../cleaner-ui/src/types/generated.ts")]
pub struct StructuralEditResponse {
    pub texts: Vec<Text>,
    #[serde(default)]
    pub matches: u32,
}

// ============================================================================
// Constants
// ============================================================================

/// API paths, relative to the API base
pub const PATH_PROJECT: &str = "/api/project";
pub const PATH_PROJECT_PROGRESS: &str = "/api/project/progress";
pub const PATH_TEXT_FILTER: &str = "/api/text/filter";
pub const PATH_TEXT_SAVE: &str = "/api/text/save";
pub const PATH_TEXT_TOKENIZE: &str = "/api/text/tokenize";
pub const PATH_TOKEN_ADD: &str = "/api/token/add";
pub const PATH_TOKEN_DELETE: &str = "/api/token/delete";
pub const PATH_TOKEN_ACCEPT: &str = "/api/token/accept";
pub const PATH_TOKEN_SPLIT: &str = "/api/token/split";
pub const PATH_TOKEN_REMOVE: &str = "/api/token/remove";

// ============================================================================
// Tests
// ============================================================================
