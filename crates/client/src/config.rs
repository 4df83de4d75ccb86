use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;

/// Public spot push endpoint.
pub const DEFAULT_BASE_URL: &str = "wss://api.gateio.ws/ws/v4/";

/// Configuration for a [`crate::WebSocketClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Connect as soon as the client is opened.
    pub auto_connect: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub transport: TransportOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auto_connect: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_secret: None,
            transport: TransportOptions::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }
}

/// Options handed to the socket transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Sent as `Sec-WebSocket-Protocol` when non-empty.
    pub protocols: Vec<String>,
    pub max_message_size: Option<usize>,
    pub max_frame_size: Option<usize>,
    /// Set TCP_NODELAY on the underlying stream.
    pub disable_nagle: bool,
}

impl TransportOptions {
    pub(crate) fn websocket_config(&self) -> WebSocketConfig {
        let mut config = WebSocketConfig::default();
        if let Some(size) = self.max_message_size {
            config.max_message_size = Some(size);
        }
        if let Some(size) = self.max_frame_size {
            config.max_frame_size = Some(size);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "wss://api.gateio.ws/ws/v4/");
        assert!(!config.auto_connect);
        assert!(config.api_key.is_none());
        assert!(config.transport.protocols.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_key":"k","transport":{"disable_nagle":true}}"#).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert!(config.transport.disable_nagle);
    }

    #[test]
    fn test_websocket_config_limits() {
        let options = TransportOptions {
            max_message_size: Some(1024),
            max_frame_size: Some(512),
            ..Default::default()
        };
        let ws = options.websocket_config();
        assert_eq!(ws.max_message_size, Some(1024));
        assert_eq!(ws.max_frame_size, Some(512));
    }
}
