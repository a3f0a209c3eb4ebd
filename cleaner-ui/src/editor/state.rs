use cleaner_core::{reduce, Action, AnnotationState, ApiError};
use dioxus::prelude::{ReadableExt, Signal, WritableExt};
use shared_types::TextId;

/// Signals backing one annotation page.
///
/// `fatal` holds a store error; once set the page shows the error screen
/// and stops dispatching. `notice` is a dismissible banner for failed
/// requests, which never change `state`.
#[derive(Clone, Copy, PartialEq)]
pub struct EditorStore {
    pub state: Signal<AnnotationState>,
    pub fatal: Signal<Option<String>>,
    pub notice: Signal<Option<String>>,
}

impl EditorStore {
    pub fn dispatch(mut self, action: Action) {
        if self.fatal.read().is_some() {
            return;
        }

        let kind = action.kind();
        let result = reduce(&mut self.state.write(), action);
        if let Err(e) = result {
            dioxus_logger::tracing::error!("Store rejected {}: {}", kind, e);
            self.fatal.set(Some(e.to_string()));
        }
    }

    pub fn report(mut self, error: &ApiError) {
        self.notice.set(Some(error.to_string()));
    }

    pub fn dismiss_notice(mut self) {
        self.notice.set(None);
    }

    pub fn text_ids(&self) -> Vec<TextId> {
        self.state.read().text_ids()
    }
}
