use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the remote deck service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("deck service request failed: {0}")]
    Transport(String),
    #[error("deck service returned status {0}")]
    Status(StatusCode),
    #[error("deck service reported success=false")]
    Rejected,
    #[error("failed to decode deck service response: {0}")]
    Decode(String),
    #[error("invalid deck service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ServiceError {
    /// True when the service answered but refused the request, either through
    /// a non-success status or a `success: false` body.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Status(_) | Self::Rejected)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::Decode(value.to_string());
        }
        if let Some(status) = value.status() {
            return Self::Status(status);
        }
        Self::Transport(value.to_string())
    }
}
