//! WebSocket client for the Gate.io spot push-data API (v4).
//!
//! Opens a socket, signs and sends subscribe/unsubscribe requests, and
//! re-emits parsed server frames as [`ClientEvent`]s.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;

pub use auth::ApiCredentials;
pub use client::WebSocketClient;
pub use config::{ClientConfig, TransportOptions, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use events::{ClientEvent, EventReceiver};
pub use gatews_core::{
    Auth, Channel, ChannelResult, Request, RequestEvent, Response, ResponseError, Subscription,
};
