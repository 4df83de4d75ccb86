//! Push channel registry.
//!
//! Each subscribable channel has a [`Subscription`] variant that shapes its
//! arguments into a wire payload, and a typed payload that [`ChannelResult`]
//! decodes `update` responses into.

mod balances;
mod tickers;
mod trades;

pub use balances::*;
pub use tickers::*;
pub use trades::*;

use crate::models::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Channel identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "spot.tickers")]
    Tickers,
    #[serde(rename = "spot.trades")]
    Trades,
    #[serde(rename = "spot.balances")]
    Balances,
    #[serde(rename = "spot.ping")]
    Ping,
    #[serde(rename = "spot.pong")]
    Pong,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Tickers,
        Channel::Trades,
        Channel::Balances,
        Channel::Ping,
        Channel::Pong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Tickers => "spot.tickers",
            Channel::Trades => "spot.trades",
            Channel::Balances => "spot.balances",
            Channel::Ping => "spot.ping",
            Channel::Pong => "spot.pong",
        }
    }

    /// Whether the channel accepts subscribe/unsubscribe requests.
    pub fn is_subscribable(&self) -> bool {
        matches!(self, Channel::Tickers | Channel::Trades | Channel::Balances)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Payload shaping
// ---------------------------------------------------------------------------

/// A subscription request for one channel, carrying that channel's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription {
    /// Ticker updates for the given currency pairs (e.g. `BTC_USDT`).
    Tickers { currency_pairs: Vec<String> },
    /// Public trades for the given currency pairs.
    Trades { currency_pairs: Vec<String> },
    /// Balance changes of the authenticated account.
    Balances,
}

/// What a [`Subscription`] puts on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Shaped {
    pub payload: Option<Value>,
    pub requires_auth: bool,
}

impl Subscription {
    pub fn tickers<I, S>(currency_pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Subscription::Tickers {
            currency_pairs: currency_pairs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn trades<I, S>(currency_pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Subscription::Trades {
            currency_pairs: currency_pairs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Subscription::Tickers { .. } => Channel::Tickers,
            Subscription::Trades { .. } => Channel::Trades,
            Subscription::Balances => Channel::Balances,
        }
    }

    pub fn shape(&self) -> Shaped {
        match self {
            Subscription::Tickers { currency_pairs } => tickers_payload(currency_pairs),
            Subscription::Trades { currency_pairs } => trades_payload(currency_pairs),
            Subscription::Balances => balances_payload(),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed results
// ---------------------------------------------------------------------------

/// Acknowledgement body for subscribe/unsubscribe requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub status: String,
}

impl SubscriptionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// The `result` of a response, decoded by channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelResult {
    Tickers(TickerUpdate),
    Trades(TradeUpdate),
    Balances(Vec<BalanceUpdate>),
    Status(SubscriptionStatus),
    Pong,
    /// The response carried no result.
    None,
    /// A channel or shape this registry does not know.
    Unrecognized(Value),
}

impl ChannelResult {
    pub fn from_response(response: &Response) -> Self {
        if response.is_pong() {
            return ChannelResult::Pong;
        }

        let Some(result) = &response.result else {
            return ChannelResult::None;
        };

        let decoded = match (response.known_channel(), response.event.as_str()) {
            (Some(_), "subscribe" | "unsubscribe") => {
                serde_json::from_value(result.clone()).map(ChannelResult::Status)
            }
            (Some(Channel::Tickers), "update") => {
                serde_json::from_value(result.clone()).map(ChannelResult::Tickers)
            }
            (Some(Channel::Trades), "update") => {
                serde_json::from_value(result.clone()).map(ChannelResult::Trades)
            }
            (Some(Channel::Balances), "update") => {
                serde_json::from_value(result.clone()).map(ChannelResult::Balances)
            }
            _ => return ChannelResult::Unrecognized(result.clone()),
        };

        decoded.unwrap_or_else(|_| ChannelResult::Unrecognized(result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
            assert_eq!(
                serde_json::to_value(channel).unwrap(),
                json!(channel.as_str())
            );
        }
        assert!("spot.unknown".parse::<Channel>().is_err());
    }

    #[test]
    fn test_subscription_channels() {
        assert_eq!(Subscription::tickers(["BTC_USDT"]).channel(), Channel::Tickers);
        assert_eq!(Subscription::trades(["BTC_USDT"]).channel(), Channel::Trades);
        assert_eq!(Subscription::Balances.channel(), Channel::Balances);
        assert!(Subscription::Balances.channel().is_subscribable());
        assert!(!Channel::Ping.is_subscribable());
    }

    #[test]
    fn test_subscribe_ack_decodes_as_status() {
        let ack = response(json!({
            "time": 1,
            "channel": "spot.tickers",
            "event": "subscribe",
            "result": { "status": "success" },
        }));

        match ack.channel_result() {
            ChannelResult::Status(status) => assert!(status.is_success()),
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[test]
    fn test_pong_and_empty_results() {
        let pong = response(json!({ "time": 1, "channel": "spot.pong", "event": "" }));
        assert_eq!(pong.channel_result(), ChannelResult::Pong);

        let empty = response(json!({ "time": 1, "channel": "spot.tickers", "event": "update" }));
        assert_eq!(empty.channel_result(), ChannelResult::None);
    }

    #[test]
    fn test_unknown_channel_falls_back_to_raw_value() {
        let raw = json!({ "contract": "BTC_USD", "last": "1" });
        let unknown = response(json!({
            "time": 1,
            "channel": "futures.tickers",
            "event": "update",
            "result": raw.clone(),
        }));

        assert_eq!(unknown.channel_result(), ChannelResult::Unrecognized(raw));
    }

    #[test]
    fn test_malformed_update_falls_back_to_raw_value() {
        let raw = json!({ "unexpected": true });
        let bad = response(json!({
            "time": 1,
            "channel": "spot.tickers",
            "event": "update",
            "result": raw.clone(),
        }));

        assert_eq!(bad.channel_result(), ChannelResult::Unrecognized(raw));
    }
}
