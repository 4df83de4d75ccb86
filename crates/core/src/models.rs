use crate::channels::{Channel, ChannelResult};
use crate::errors::ResponseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Outgoing requests
// ---------------------------------------------------------------------------

/// The action a request performs on its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestEvent {
    Subscribe,
    Unsubscribe,
}

impl RequestEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestEvent::Subscribe => "subscribe",
            RequestEvent::Unsubscribe => "unsubscribe",
        }
    }
}

impl std::fmt::Display for RequestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication scheme tag. The push API only knows `api_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    ApiKey,
}

/// Signed credentials attached to private channel requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub method: AuthMethod,
    #[serde(rename = "KEY")]
    pub key: String,
    /// Hex-encoded HMAC-SHA512 of `channel=<channel>&event=<event>&time=<time>`.
    #[serde(rename = "SIGN")]
    pub sign: String,
}

/// A single frame sent to the server.
///
/// Optional fields are left out of the JSON entirely when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    /// Unix time in seconds.
    pub time: i64,
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<RequestEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

impl Request {
    pub fn new(id: u64, time: i64, channel: Channel) -> Self {
        Self {
            id,
            time,
            channel,
            event: None,
            payload: None,
            auth: None,
        }
    }

    pub fn with_event(mut self, event: Option<RequestEvent>) -> Self {
        self.event = event;
        self
    }

    pub fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.payload = payload;
        self
    }

    /// The exact string the server expects to be signed for this request.
    /// An absent event signs as the empty string.
    pub fn signature_payload(&self) -> String {
        format!(
            "channel={}&event={}&time={}",
            self.channel,
            self.event.map(|e| e.as_str()).unwrap_or_default(),
            self.time
        )
    }
}

// ---------------------------------------------------------------------------
// Incoming responses
// ---------------------------------------------------------------------------

/// Error block reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// A single frame received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub time: i64,
    pub channel: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Response {
    /// Split a response into success or a classified server error.
    pub fn into_result(self) -> Result<Response, ResponseError> {
        match self.error.clone() {
            None => Ok(self),
            Some(body) => Err(ResponseError::classify(body, self)),
        }
    }

    /// The registry channel this response belongs to, if it is a known one.
    pub fn known_channel(&self) -> Option<Channel> {
        self.channel.parse().ok()
    }

    pub fn is_tickers(&self) -> bool {
        self.known_channel() == Some(Channel::Tickers)
    }

    pub fn is_trades(&self) -> bool {
        self.known_channel() == Some(Channel::Trades)
    }

    pub fn is_balances(&self) -> bool {
        self.known_channel() == Some(Channel::Balances)
    }

    pub fn is_pong(&self) -> bool {
        self.known_channel() == Some(Channel::Pong)
    }

    pub fn is_update(&self) -> bool {
        self.event == "update"
    }

    /// Decode `result` into the typed payload for this response's channel.
    pub fn channel_result(&self) -> ChannelResult {
        ChannelResult::from_response(self)
    }
}
