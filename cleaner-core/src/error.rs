use shared_types::TextId;

/// Errors raised by the token mutation engine
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CleanerError {
    #[error("unsupported token operation: {0}")]
    UnsupportedOperation(String),

    #[error("apply requires a replacement value")]
    MissingReplacement,
}

/// Errors raised by the annotation store.
///
/// All of these are fatal: they mean either a programming error on the
/// dispatching side or a server response that breaks the text invariants.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("malformed {kind} action: {reason}")]
    MalformedAction { kind: String, reason: String },

    #[error("text {0} does not have contiguous token indices")]
    NonContiguousIndices(TextId),
}
