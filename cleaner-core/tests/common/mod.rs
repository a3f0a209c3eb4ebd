//! In-memory annotation API for integration tests
//!
//! Keeps its own corpus and mutates it the way the real server does, so a
//! test can check that the client state converges on the server's.

#![allow(dead_code)]

use std::cell::RefCell;

use async_trait::async_trait;
use cleaner_core::mutation::{mutate_token, TokenOp};
use cleaner_core::{AnnotationApi, ApiError};
use shared_types::{
    ApplyTokenRequest, FilterTextsRequest, Project, ProjectId, ProjectProgress,
    RemoveTokenRequest, SaveTextsRequest, SavedFilter, SplitTokenRequest, StructuralEditResponse,
    Text, TextId, TextPage, Token, TokenId, TokenMutationResponse, TokenScopeRequest,
    TokenizeRequest,
};

pub fn text(id: &str, values: &[&str]) -> Text {
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

pub fn project(id: &str) -> Project {
    Project {
        id: ProjectId::new(id),
        name: format!("Project {id}"),
        description: String::new(),
        parallel_corpus: false,
        created_at: None,
    }
}

pub struct FakeApi {
    project: Project,
    corpus: RefCell<Vec<Text>>,
    fail_next: RefCell<Option<ApiError>>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeApi {
    pub fn new(project_id: &str, texts: Vec<Text>) -> Self {
        Self {
            project: project(project_id),
            corpus: RefCell::new(texts),
            fail_next: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make the next request fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn server_text(&self, text_id: &str) -> Option<Text> {
        self.corpus
            .borrow()
            .iter()
            .find(|t| t.id.as_str() == text_id)
            .cloned()
    }

    fn enter(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(endpoint);
        match self.fail_next.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn focus_token(&self, text_id: &TextId, token_id: &TokenId) -> Result<Token, ApiError> {
        self.corpus
            .borrow()
            .iter()
            .find(|t| &t.id == text_id)
            .and_then(|t| t.token(token_id))
            .cloned()
            .ok_or_else(|| ApiError::Status {
                endpoint: "token".into(),
                status: 404,
            })
    }

    /// Tokens targeted by a scoped request: the focus, or every token with
    /// the same original value across `text_ids` that `eligible` accepts.
    fn scope(
        &self,
        focus_text: &TextId,
        focus: &Token,
        apply_all: bool,
        text_ids: &[TextId],
        eligible: impl Fn(&Token) -> bool,
    ) -> Vec<(TextId, TokenId)> {
        if !apply_all {
            return vec![(focus_text.clone(), focus.id.clone())];
        }
        self.corpus
            .borrow()
            .iter()
            .filter(|t| text_ids.contains(&t.id))
            .flat_map(|t| {
                t.tokens
                    .iter()
                    .filter(|token| {
                        token.value == focus.value && (token.id == focus.id || eligible(token))
                    })
                    .map(|token| (t.id.clone(), token.id.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn mutate(&self, targets: Vec<(TextId, TokenId)>, op: &TokenOp) -> TokenMutationResponse {
        let mut response = TokenMutationResponse::default();
        let mut corpus = self.corpus.borrow_mut();
        for (text_id, token_id) in targets {
            let Some(text) = corpus.iter_mut().find(|t| t.id == text_id) else {
                continue;
            };
            if let Some(token) = text.tokens.iter_mut().find(|t| t.id == token_id) {
                if let Some(updated) = mutate_token(token, op) {
                    *token = updated;
                }
            }
            response.text_token_ids.entry(text_id).or_default().push(token_id);
            response.matches += 1;
        }
        response
    }
}

fn renumber(text: &mut Text) {
    for (pos, token) in text.tokens.iter_mut().enumerate() {
        token.index = pos as u32;
    }
}

#[async_trait(?Send)]
impl AnnotationApi for FakeApi {
    async fn fetch_project(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        self.enter("project")?;
        if project_id != &self.project.id {
            return Err(ApiError::Status {
                endpoint: "project".into(),
                status: 404,
            });
        }
        Ok(self.project.clone())
    }

    async fn filter_texts(&self, request: &FilterTextsRequest) -> Result<TextPage, ApiError> {
        self.enter("text/filter")?;
        let corpus = self.corpus.borrow();
        let matching: Vec<&Text> = corpus
            .iter()
            .filter(|t| match request.saved {
                SavedFilter::All => true,
                SavedFilter::Yes => t.saved,
                SavedFilter::No => !t.saved,
            })
            .filter(|t| {
                request.search_term.is_empty()
                    || t.tokens.iter().any(|token| token.value == request.search_term)
            })
            .collect();

        Ok(TextPage {
            total_count: matching.len() as u32,
            texts: matching
                .into_iter()
                .skip(request.skip as usize)
                .take(request.limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn fetch_progress(&self, _project_id: &ProjectId) -> Result<ProjectProgress, ApiError> {
        self.enter("project/progress")?;
        let corpus = self.corpus.borrow();
        Ok(ProjectProgress {
            saved: corpus.iter().filter(|t| t.saved).count() as u32,
            total: corpus.len() as u32,
        })
    }

    async fn apply_token(
        &self,
        request: &ApplyTokenRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        self.enter("token/add")?;
        let focus = self.focus_token(&request.text_id, &request.token_id)?;
        let targets = self.scope(
            &request.text_id,
            &focus,
            request.apply_all,
            &request.text_ids,
            |token| token.replacement().is_none(),
        );
        let op = TokenOp::Apply {
            focus: request.token_id.clone(),
            replacement: request.replacement.clone(),
        };
        Ok(self.mutate(targets, &op))
    }

    async fn delete_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        self.enter("token/delete")?;
        let focus = self.focus_token(&request.text_id, &request.token_id)?;
        let targets = self.scope(
            &request.text_id,
            &focus,
            request.apply_all,
            &request.text_ids,
            |token| token.resolved_value() == focus.resolved_value(),
        );
        Ok(self.mutate(targets, &TokenOp::Delete))
    }

    async fn accept_token(
        &self,
        request: &TokenScopeRequest,
    ) -> Result<TokenMutationResponse, ApiError> {
        self.enter("token/accept")?;
        let focus = self.focus_token(&request.text_id, &request.token_id)?;
        let targets = self.scope(
            &request.text_id,
            &focus,
            request.apply_all,
            &request.text_ids,
            |token| token.suggestion().is_some(),
        );
        Ok(self.mutate(targets, &TokenOp::Accept))
    }

    async fn split_token(
        &self,
        request: &SplitTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError> {
        self.enter("token/split")?;
        let mut corpus = self.corpus.borrow_mut();
        let text = corpus
            .iter_mut()
            .find(|t| t.id == request.text_id)
            .ok_or_else(|| ApiError::Status {
                endpoint: "token/split".into(),
                status: 404,
            })?;

        let pos = request.token_index as usize;
        let parts: Vec<Token> = request
            .current_value
            .split_whitespace()
            .map(|part| Token::new(uuid::Uuid::new_v4().to_string(), 0, part))
            .collect();
        text.tokens.splice(pos..=pos, parts);
        renumber(text);

        Ok(StructuralEditResponse {
            texts: vec![text.clone()],
            matches: 1,
        })
    }

    async fn remove_token(
        &self,
        request: &RemoveTokenRequest,
    ) -> Result<StructuralEditResponse, ApiError> {
        self.enter("token/remove")?;
        let focus = self.focus_token(&request.text_id, &request.token_id)?;
        let mut corpus = self.corpus.borrow_mut();
        let mut touched = Vec::new();
        let mut matches = 0;

        for text in corpus.iter_mut() {
            let in_scope = if request.apply_all {
                request.text_ids.contains(&text.id)
            } else {
                text.id == request.text_id
            };
            if !in_scope {
                continue;
            }
            let before = text.tokens.len();
            text.tokens.retain(|token| {
                if request.apply_all {
                    token.value != focus.value
                } else {
                    token.id != focus.id
                }
            });
            let removed = before - text.tokens.len();
            if removed > 0 {
                renumber(text);
                matches += removed as u32;
                touched.push(text.clone());
            }
        }

        Ok(StructuralEditResponse {
            texts: touched,
            matches,
        })
    }

    async fn tokenize(&self, request: &TokenizeRequest) -> Result<StructuralEditResponse, ApiError> {
        self.enter("text/tokenize")?;
        let mut corpus = self.corpus.borrow_mut();
        let text = corpus
            .iter_mut()
            .find(|t| t.id == request.text_id)
            .ok_or_else(|| ApiError::Status {
                endpoint: "text/tokenize".into(),
                status: 404,
            })?;

        // merge from the back so earlier indices stay valid
        for group in request.index_groups.iter().rev() {
            let (Some(&first), Some(&last)) = (group.first(), group.last()) else {
                continue;
            };
            let merged: String = text.tokens[first as usize..=last as usize]
                .iter()
                .map(|token| token.current_value.as_str())
                .collect();
            let token = Token::new(uuid::Uuid::new_v4().to_string(), first, merged);
            text.tokens
                .splice(first as usize..=last as usize, std::iter::once(token));
        }
        renumber(text);

        Ok(StructuralEditResponse {
            texts: vec![text.clone()],
            matches: request.index_groups.len() as u32,
        })
    }

    async fn save_texts(&self, request: &SaveTextsRequest) -> Result<(), ApiError> {
        self.enter("text/save")?;
        for text in self.corpus.borrow_mut().iter_mut() {
            if request.text_ids.contains(&text.id) {
                text.saved = request.saved;
            }
        }
        Ok(())
    }
}
