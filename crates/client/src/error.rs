use gatews_core::ResponseError;
use tokio_tungstenite::tungstenite;

/// Errors returned by, or reported through the events of, a
/// [`crate::WebSocketClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("WebSocket is not ready")]
    NotReady,
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("Transport error: {0}")]
    Transport(#[from] tungstenite::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ClientError {
    /// The server-reported error, if this is one.
    pub fn as_response_error(&self) -> Option<&ResponseError> {
        match self {
            ClientError::Response(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
