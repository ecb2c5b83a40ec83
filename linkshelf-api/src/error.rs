use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("could not reach the server: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Status { status: u16, message: Option<String> },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The `error` text the server put in its response body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ApiError::Connection(_))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
