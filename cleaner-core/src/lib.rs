//! Client-side engine of the text cleaner
//!
//! Holds the annotation state of one page of texts, reconciles
//! server-confirmed token operations into it and maps mouse selections onto
//! token ids. Nothing here renders; the UI crate drives it.

pub mod api;
pub mod config;
pub mod error;
pub mod grouping;
#[cfg(feature = "http")]
pub mod http;
pub mod mutation;
pub mod selection;
pub mod session;
pub mod store;

pub use api::{AnnotationApi, ApiError};
pub use config::{
    load_config, load_config_from, load_env_file, load_env_file_from, CleanerConfig, ConfigError,
};
pub use error::{CleanerError, StoreError};
pub use grouping::{group_contiguous, IndexGroups};
#[cfg(feature = "http")]
pub use http::HttpAnnotationApi;
pub use mutation::{mutate_token, mutate_tokens, TokenOp, TokenOpKind, TokenTargets, Texts};
pub use selection::{select_span, Selection};
pub use session::{Session, SessionError};
pub use store::{
    dispatch_json, reduce, Action, AnnotationState, RequestContext, ToastInfo, ToastKind,
};
