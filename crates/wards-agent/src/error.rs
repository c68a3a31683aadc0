use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("reasoning CLI error: {0}")]
    Cli(String),

    #[error("reasoning response parse error: {0}")]
    Parse(String),

    #[error("reasoning call timed out after {0} seconds")]
    Timeout(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
