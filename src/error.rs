use thiserror::Error;

#[derive(Error, Debug)]
pub enum FollowUpError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("No eligible input: {0}")]
    NoInput(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rule set error: {0}")]
    RuleSet(#[from] serde_json::Error),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),
}
