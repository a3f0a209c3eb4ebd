use chrono::{DateTime, Utc};
use cleaner_core::{ToastInfo, ToastKind};
use shared_types::{ProjectProgress, Token, TokenState};

fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

pub fn toast_message(toast: &ToastInfo) -> String {
    let tokens = plural(toast.count, "token");
    match toast.kind {
        ToastKind::Apply => format!("Applied \"{}\" to {tokens}", toast.content),
        ToastKind::Delete => format!("Removed \"{}\" from {tokens}", toast.content),
        ToastKind::Accept => format!("Accepted \"{}\" on {tokens}", toast.content),
        ToastKind::Split => format!("Split {tokens}"),
        ToastKind::Remove => format!("Removed {tokens}"),
        ToastKind::Tokenize => format!("Merged {}", plural(toast.count, "group")),
    }
}

/// CSS classes for a token span.
pub fn token_class(token: &Token, selected: bool) -> String {
    let mut class = String::from("token");
    match token.state {
        TokenState::Confirmed(_) => class.push_str(" token-confirmed"),
        TokenState::Suggested(_) => class.push_str(" token-suggested"),
        TokenState::Original => {}
    }
    if has_pending_edit(token) {
        class.push_str(" token-edited");
    }
    if selected {
        class.push_str(" token-selected");
    }
    class
}

/// The input differs from what the server last confirmed.
pub fn has_pending_edit(token: &Token) -> bool {
    token.current_value != token.resolved_value()
}

/// Input width in characters, never narrower than two.
pub fn input_width(value: &str) -> usize {
    value.chars().count().max(2)
}

pub fn progress_label(progress: &ProjectProgress) -> String {
    format!(
        "{}/{} saved ({:.0}%)",
        progress.saved,
        progress.total,
        progress.percentage()
    )
}

pub fn page_label(page: u32, page_count: u32) -> String {
    format!("Page {} of {}", page, page_count.max(1))
}

pub fn created_label(created_at: Option<DateTime<Utc>>) -> Option<String> {
    created_at.map(|at| format!("Created {}", at.format("%Y-%m-%d")))
}

/// Project id from a `/project/<id>` style path: the last non-empty segment.
pub fn project_id_from_path(path: &str) -> Option<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .filter(|segment| *segment != "project")
        .map(str::to_string)
}
