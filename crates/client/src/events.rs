use crate::error::ClientError;
use gatews_core::Response;
use tokio::sync::mpsc;

/// Everything a client reports after it has been created.
#[derive(Debug)]
pub enum ClientEvent {
    /// The socket finished its handshake and accepts requests.
    Open,
    /// The socket is gone; `connect` must be called again to continue.
    Close,
    /// A server-reported error, an undecodable frame, or a transport failure.
    Error(ClientError),
    /// A response without an error.
    Message(Response),
}

impl ClientEvent {
    pub fn is_open(&self) -> bool {
        matches!(self, ClientEvent::Open)
    }

    pub fn is_close(&self) -> bool {
        matches!(self, ClientEvent::Close)
    }
}

pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;
pub(crate) type EventSender = mpsc::UnboundedSender<ClientEvent>;
