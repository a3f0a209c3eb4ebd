//! Token mutation engine
//!
//! Reconciles server-confirmed apply/delete/accept operations into the local
//! texts. Texts that no operation touches keep their `Arc`, so callers can
//! detect changes with `Arc::ptr_eq`.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use shared_types::{Text, TextId, Token, TokenId, TokenState};

use crate::error::CleanerError;

/// Texts of the current page keyed by id, in page order
pub type Texts = IndexMap<TextId, Arc<Text>>;

/// Token ids to update, per text
pub type TokenTargets = BTreeMap<TextId, Vec<TokenId>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOpKind {
    Apply,
    Delete,
    Accept,
}

impl TokenOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Delete => "delete",
            Self::Accept => "accept",
        }
    }
}

impl FromStr for TokenOpKind {
    type Err = CleanerError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "apply" => Ok(Self::Apply),
            "delete" => Ok(Self::Delete),
            "accept" => Ok(Self::Accept),
            other => Err(CleanerError::UnsupportedOperation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOp {
    /// Confirm `replacement` on the focus token, suggest it on the others
    Apply {
        focus: TokenId,
        replacement: String,
    },
    Delete,
    Accept,
}

impl TokenOp {
    /// Build an op from its wire name.
    pub fn parse(
        kind: &str,
        focus: TokenId,
        replacement: Option<String>,
    ) -> Result<Self, CleanerError> {
        match kind.parse::<TokenOpKind>()? {
            TokenOpKind::Apply => Ok(Self::Apply {
                focus,
                replacement: replacement.ok_or(CleanerError::MissingReplacement)?,
            }),
            TokenOpKind::Delete => Ok(Self::Delete),
            TokenOpKind::Accept => Ok(Self::Accept),
        }
    }

    pub fn kind(&self) -> TokenOpKind {
        match self {
            Self::Apply { .. } => TokenOpKind::Apply,
            Self::Delete => TokenOpKind::Delete,
            Self::Accept => TokenOpKind::Accept,
        }
    }
}

/// Apply `op` to every targeted token and return the new texts.
///
/// Targets naming texts or tokens that are not loaded are ignored.
pub fn mutate_tokens(texts: &Texts, targets: &TokenTargets, op: &TokenOp) -> Texts {
    texts
        .iter()
        .map(|(text_id, text)| {
            let next = match targets.get(text_id) {
                Some(token_ids) if !token_ids.is_empty() => mutate_text(text, token_ids, op),
                _ => Arc::clone(text),
            };
            (text_id.clone(), next)
        })
        .collect()
}

fn mutate_text(text: &Arc<Text>, token_ids: &[TokenId], op: &TokenOp) -> Arc<Text> {
    let targeted: HashSet<&TokenId> = token_ids.iter().collect();
    let mut next: Option<Text> = None;

    for (pos, token) in text.tokens.iter().enumerate() {
        if !targeted.contains(&token.id) {
            continue;
        }
        if let Some(updated) = mutate_token(token, op) {
            next.get_or_insert_with(|| Text::clone(text)).tokens[pos] = updated;
        }
    }

    next.map(Arc::new).unwrap_or_else(|| Arc::clone(text))
}

/// Returns the updated token, or `None` when `op` leaves it as it is.
pub fn mutate_token(token: &Token, op: &TokenOp) -> Option<Token> {
    let (state, current_value) = match op {
        TokenOp::Apply { focus, replacement } => {
            let state = if &token.id == focus {
                TokenState::Confirmed(replacement.clone())
            } else {
                TokenState::Suggested(replacement.clone())
            };
            (state, replacement.clone())
        }
        TokenOp::Delete => (TokenState::Original, token.value.clone()),
        TokenOp::Accept => match &token.state {
            TokenState::Suggested(suggestion) => {
                (TokenState::Confirmed(suggestion.clone()), suggestion.clone())
            }
            // nothing to accept
            TokenState::Original | TokenState::Confirmed(_) => return None,
        },
    };

    if token.state == state && token.current_value == current_value {
        return None;
    }

    Some(Token {
        state,
        current_value,
        ..token.clone()
    })
}
