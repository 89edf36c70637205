use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypeError>;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("no deserializer registered for operator type `{0}`")]
    UnknownType(String),

    #[error("expected operator type `{expected}`, found `{found}`")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("invalid `{tag}` dict: {reason}")]
    InvalidDict { tag: String, reason: String },

    #[error("field `{0}` cannot be modified")]
    ImmutableField(String),

    #[error(transparent)]
    Core(#[from] opgraph_core::Error),
}

impl From<serde_json::Error> for TypeError {
    fn from(e: serde_json::Error) -> Self {
        TypeError::InvalidDict {
            tag: "<json>".into(),
            reason: e.to_string(),
        }
    }
}
