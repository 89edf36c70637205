use thiserror::Error;

use crate::id::OperatorId;
use crate::result_type::ResultType;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A child wired into a port produces a different result type than the port accepts.
    #[error("{port} port expects {expected} sources, but operator {source_id} produces {actual}")]
    SourceTypeMismatch {
        port: &'static str,
        expected: ResultType,
        actual: ResultType,
        source_id: OperatorId,
    },

    #[error("invalid source type: {0}")]
    InvalidResultType(String),

    /// `context` holds the JSON of the operator that was searched.
    #[error("no source found with id {id} in {context}")]
    SourceNotFound { id: OperatorId, context: String },

    #[error("operator field `{0}` must not be empty")]
    EmptyField(&'static str),

    /// A restored graph reuses an id for nodes with different content.
    #[error("id {0} is used by two different operators")]
    DuplicateId(OperatorId),

    #[error("operator id sequence exhausted")]
    IdsExhausted,

    #[error("`{0}` must be a finite number")]
    NonFinite(String),

    #[error("schema entry for unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serde(e.to_string())
    }
}
