use thiserror::Error;

/// Everything the backend client can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend bounced the request to its OAuth consent route.
    #[error("Not connected. Please click 'Connect Gmail' first.")]
    NotConnected,

    #[error("API error: {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn is_not_connected(&self) -> bool {
        matches!(self, ApiError::NotConnected)
    }
}
