use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("graph: {0}")]
    Graph(#[from] opgraph_core::Error),

    #[error("invalid graph document: {0}")]
    Invalid(String),
}
