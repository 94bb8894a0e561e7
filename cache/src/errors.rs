//! Contains [DecodeError], the error type of every load path.

use thiserror::Error;

/// Errors that can occur while loading a serialized graph.
///
/// None of these are recoverable mid-load; a partially decoded graph is
/// never returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A tagged expression record has an unknown tag, a wrong child count
    /// for its variant, or a payload that does not parse.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// A function-call record names a function with no registry entry.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// An index points outside its pool, or a dependency names a target
    /// with no node record.
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    /// A record decoded successfully but to an incompatible variant, e.g.
    /// a global variable entry that is not a variable form.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unable to read graph: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed text encoding: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed compact encoding: {0}")]
    Binary(#[from] postcard::Error),
}
