//! Error types for the command layer.
//!
//! Only usage and integrity problems surface as errors. A command whose
//! target no longer resolves is an expected state mismatch and no-ops
//! silently instead (the document is the source of truth; a stale command
//! must never corrupt it).

use apidoc_model::Dialect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("command not supported for dialect {0}")]
    UnsupportedDialect(Dialect),

    #[error("unknown command type: {0}")]
    UnknownCommandType(String),

    #[error("marshalled command has no type tag")]
    MissingTypeTag,

    #[error("malformed command payload: {0}")]
    InvalidPayload(String),

    #[error("marshalling error: {0}")]
    Marshalling(#[from] serde_json::Error),
}
