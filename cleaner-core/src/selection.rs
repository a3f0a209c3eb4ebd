//! Drag and click selection of tokens within a single text

use std::collections::BTreeSet;

use shared_types::{Text, TextId, Token, TokenId};

use crate::grouping::{group_contiguous, IndexGroups};

/// Map a drag between two anchor indices onto token ids, in ascending order.
///
/// Anchors may arrive reversed when the drag went right to left. A missing
/// anchor or a range that starts past the last token yields no tokens; a
/// range running past the end is clamped.
pub fn select_span(tokens: &[Token], start: Option<u32>, end: Option<u32>) -> Vec<TokenId> {
    let (Some(start), Some(end)) = (start, end) else {
        return Vec::new();
    };

    let lo = start.min(end) as usize;
    let hi = (start.max(end) as usize).saturating_add(1);

    let mut ordered: Vec<&Token> = tokens.iter().collect();
    ordered.sort_by_key(|token| token.index);

    if lo >= ordered.len() {
        return Vec::new();
    }
    let hi = hi.min(ordered.len());

    ordered[lo..hi].iter().map(|token| token.id.clone()).collect()
}

/// Token selection state. At most one text holds a selection at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub text_id: Option<TextId>,
    /// A drag is in progress
    pub dragging: bool,
    pub anchor: Option<u32>,
    pub focus: Option<u32>,
    pub token_ids: Vec<TokenId>,
    pub indices: BTreeSet<u32>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }

    pub fn is_on(&self, text_id: &TextId) -> bool {
        self.text_id.as_ref() == Some(text_id)
    }

    pub fn contains(&self, text_id: &TextId, token_id: &TokenId) -> bool {
        self.is_on(text_id) && self.token_ids.contains(token_id)
    }

    /// Whether pointer moves over `text_id` should extend the selection.
    pub fn is_dragging_on(&self, text_id: &TextId) -> bool {
        self.dragging && self.is_on(text_id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Start a drag on `text`. Any selection on another text is dropped.
    pub fn begin(&mut self, text: &Text, index: u32) {
        self.claim(&text.id);
        self.dragging = true;
        self.anchor = Some(index);
        self.focus = Some(index);
        self.remap(text);
    }

    /// Move the drag end. Ignored unless dragging on this text.
    pub fn extend(&mut self, text: &Text, index: u32) {
        if !self.is_dragging_on(&text.id) {
            return;
        }
        self.focus = Some(index);
        self.remap(text);
    }

    pub fn finish(&mut self, text: &Text, index: u32) {
        if !self.is_dragging_on(&text.id) {
            return;
        }
        self.focus = Some(index);
        self.remap(text);
        self.dragging = false;
    }

    /// The pointer left without a mouse-up; keep the span, stop dragging.
    pub fn cancel(&mut self) {
        self.dragging = false;
    }

    /// Add or remove one token index, for multi-select clicks.
    pub fn toggle(&mut self, text: &Text, index: u32) {
        self.claim(&text.id);
        self.dragging = false;
        self.anchor = None;
        self.focus = None;

        if !self.indices.remove(&index) && text.token_at(index).is_some() {
            self.indices.insert(index);
        }
        self.token_ids = self
            .indices
            .iter()
            .filter_map(|&i| text.token_at(i).map(|token| token.id.clone()))
            .collect();

        if self.indices.is_empty() {
            self.clear();
        }
    }

    /// Selected indices grouped for a tokenize request.
    pub fn index_groups(&self) -> IndexGroups {
        group_contiguous(self.indices.iter().copied())
    }

    fn claim(&mut self, text_id: &TextId) {
        if !self.is_on(text_id) {
            self.clear();
            self.text_id = Some(text_id.clone());
        }
    }

    fn remap(&mut self, text: &Text) {
        self.token_ids = select_span(&text.tokens, self.anchor, self.focus);
        self.indices = self
            .token_ids
            .iter()
            .filter_map(|id| text.token(id).map(|token| token.index))
            .collect();
    }
}
