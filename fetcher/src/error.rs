use reqwest::StatusCode;

/// Why a single network read produced no value.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection failure or timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    /// The node answered with a JSON-RPC error envelope.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The node answered with something that is not a JSON-RPC response.
    #[error("malformed rpc response: {0}")]
    Protocol(String),
    #[error("invalid metadata document: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_timeout())
    }
}
