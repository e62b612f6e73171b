use crate::registration::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

/// Gateway crate-specific Result type alias
pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(#[source] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Backend { status: StatusCode, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[source] reqwest::Error),

    // Local validation never reaches the network.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Text handed back to the agent. The gateway adds the `ERROR: ` marker.
    pub fn agent_message(&self) -> String {
        match self {
            GatewayError::BackendUnavailable(_) => {
                "The backend service could not be reached. No action was performed; you may retry later."
                    .to_string()
            }
            GatewayError::Backend { status, message } => {
                if message.trim().is_empty() {
                    format!("Backend responded with status {status}.")
                } else {
                    message.clone()
                }
            }
            GatewayError::Decode(_) => {
                "The backend returned a response that could not be read.".to_string()
            }
            other => other.to_string(),
        }
    }
}
