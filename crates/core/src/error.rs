use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Selection config is structurally invalid and cannot be evaluated.
    #[error("Invalid selection config: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
