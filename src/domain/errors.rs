//! Checklist domain errors

use thiserror::Error;

/// Errors raised while parsing a checklist document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The document is not well-formed XML; no partial finding set is
    /// produced.
    #[error("malformed checklist document: {0}")]
    Malformed(String),
}

/// Errors raised by finding-store mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("no finding with id {id}")]
    NotFound { id: String },
}

/// Errors raised while writing edits back into the document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteError {
    /// A finding's back-reference no longer resolves to a document node.
    #[error("finding {id} no longer resolves to a document node")]
    MissingNode { id: String },

    /// The storage collaborator could not provide or operate a writable
    /// sink.
    #[error("storage sink unavailable: {reason}")]
    SinkUnavailable { reason: String },

    #[error("failed to serialize checklist document: {0}")]
    Serialize(String),
}
