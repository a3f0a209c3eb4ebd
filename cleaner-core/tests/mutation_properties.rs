use std::collections::BTreeSet;
use std::sync::Arc;

use cleaner_core::{
    group_contiguous, mutate_tokens, select_span, TokenOp, TokenTargets, Texts,
};
use proptest::prelude::*;
use shared_types::{Text, TextId, Token, TokenId, TokenState};

fn token_state() -> impl Strategy<Value = TokenState> {
    prop_oneof![
        Just(TokenState::Original),
        "[a-z]{1,4}".prop_map(TokenState::Suggested),
        "[a-z]{1,4}".prop_map(TokenState::Confirmed),
    ]
}

fn token_rows() -> impl Strategy<Value = Vec<(String, TokenState, bool)>> {
    prop::collection::vec(("[a-z]{1,4}", token_state(), any::<bool>()), 1..6)
}

/// Loaded texts plus the targets a server might confirm for them
fn page() -> impl Strategy<Value = (Texts, TokenTargets)> {
    prop::collection::vec(token_rows(), 1..4).prop_map(|rows| {
        let mut texts = Texts::new();
        let mut targets = TokenTargets::new();

        for (t, row) in rows.into_iter().enumerate() {
            let text_id = TextId::new(format!("x{t}"));
            let mut tokens = Vec::new();
            for (i, (value, state, targeted)) in row.into_iter().enumerate() {
                let mut token = Token::new(format!("x{t}-{i}"), i as u32, value);
                if let TokenState::Suggested(v) | TokenState::Confirmed(v) = &state {
                    token.current_value = v.clone();
                }
                token.state = state;
                if targeted {
                    targets
                        .entry(text_id.clone())
                        .or_default()
                        .push(token.id.clone());
                }
                tokens.push(token);
            }
            let text = Text {
                id: text_id.clone(),
                tokens,
                saved: false,
                identifiers: Vec::new(),
                reference: None,
                original: String::new(),
            };
            texts.insert(text_id, Arc::new(text));
        }
        (texts, targets)
    })
}

fn is_targeted(targets: &TokenTargets, text_id: &TextId, token_id: &TokenId) -> bool {
    targets
        .get(text_id)
        .is_some_and(|ids| ids.contains(token_id))
}

fn first_target(targets: &TokenTargets) -> TokenId {
    targets
        .values()
        .flatten()
        .next()
        .cloned()
        .unwrap_or_else(|| TokenId::new("none"))
}

proptest! {
    #[test]
    fn prop_untargeted_tokens_are_untouched(
        (texts, targets) in page(),
        replacement in "[a-z]{1,4}",
        which in 0..3usize,
    ) {
        let op = match which {
            0 => TokenOp::Apply { focus: first_target(&targets), replacement },
            1 => TokenOp::Delete,
            _ => TokenOp::Accept,
        };
        let after = mutate_tokens(&texts, &targets, &op);

        prop_assert_eq!(after.len(), texts.len());
        for (text_id, before) in &texts {
            let now = &after[text_id];
            if !targets.contains_key(text_id) {
                prop_assert!(Arc::ptr_eq(before, now));
            }
            for (old, new) in before.tokens.iter().zip(&now.tokens) {
                prop_assert_eq!(&old.id, &new.id);
                prop_assert_eq!(old.index, new.index);
                prop_assert_eq!(&old.value, &new.value);
                if !is_targeted(&targets, text_id, &old.id) {
                    prop_assert_eq!(old, new);
                }
            }
        }
    }

    #[test]
    fn prop_apply_sets_value_on_every_target(
        (texts, targets) in page(),
        replacement in "[a-z]{1,4}",
    ) {
        let focus = first_target(&targets);
        let op = TokenOp::Apply { focus: focus.clone(), replacement: replacement.clone() };
        let after = mutate_tokens(&texts, &targets, &op);

        for (text_id, ids) in &targets {
            for id in ids {
                let token = after[text_id].token(id).unwrap();
                prop_assert_eq!(&token.current_value, &replacement);
                let expected = if id == &focus {
                    TokenState::Confirmed(replacement.clone())
                } else {
                    TokenState::Suggested(replacement.clone())
                };
                prop_assert_eq!(&token.state, &expected);
            }
        }
    }

    #[test]
    fn prop_accept_only_promotes_suggestions(
        (texts, targets) in page(),
    ) {
        let after = mutate_tokens(&texts, &targets, &TokenOp::Accept);

        for (text_id, ids) in &targets {
            for id in ids {
                let old = texts[text_id].token(id).unwrap();
                let new = after[text_id].token(id).unwrap();
                match &old.state {
                    TokenState::Suggested(s) => {
                        prop_assert_eq!(&new.state, &TokenState::Confirmed(s.clone()));
                        prop_assert_eq!(&new.current_value, s);
                    }
                    _ => prop_assert_eq!(old, new),
                }
            }
        }
    }

    #[test]
    fn prop_delete_after_apply_restores_original(
        (texts, targets) in page(),
        replacement in "[a-z]{1,4}",
    ) {
        let op = TokenOp::Apply { focus: first_target(&targets), replacement };
        let applied = mutate_tokens(&texts, &targets, &op);
        let cleared = mutate_tokens(&applied, &targets, &TokenOp::Delete);

        for (text_id, ids) in &targets {
            for id in ids {
                let token = cleared[text_id].token(id).unwrap();
                prop_assert_eq!(&token.state, &TokenState::Original);
                prop_assert_eq!(&token.current_value, &token.value);
                prop_assert!(!token.is_modified());
            }
        }
    }

    #[test]
    fn prop_groups_partition_the_selection(
        indices in prop::collection::vec(0u32..40, 0..20),
    ) {
        let grouped = group_contiguous(indices.iter().copied());
        let expected: Vec<u32> = indices.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let flat: Vec<u32> = grouped.groups.iter().flatten().copied().collect();
        prop_assert_eq!(flat, expected);

        for group in &grouped.groups {
            prop_assert!(group.windows(2).all(|w| w[1] == w[0] + 1));
        }
        for pair in grouped.groups.windows(2) {
            let gap_start = pair[0].last().copied().unwrap_or_default();
            let gap_end = pair[1].first().copied().unwrap_or_default();
            prop_assert!(gap_end > gap_start + 1);
        }
        let valid = !grouped.groups.is_empty() && grouped.groups.iter().all(|g| g.len() >= 2);
        prop_assert_eq!(grouped.valid, valid);
    }

    #[test]
    fn prop_span_is_ascending_and_clamped(
        len in 0u32..12,
        start in 0u32..16,
        end in 0u32..16,
    ) {
        let tokens: Vec<Token> = (0..len)
            .rev()
            .map(|i| Token::new(format!("t{i}"), i, "w"))
            .collect();
        let span = select_span(&tokens, Some(start), Some(end));

        let lo = start.min(end);
        let hi = start.max(end);
        let expected: Vec<TokenId> = (lo..=hi)
            .filter(|i| *i < len)
            .map(|i| TokenId::new(format!("t{i}")))
            .collect();
        prop_assert_eq!(span, expected);
    }
}
