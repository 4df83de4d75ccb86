use crate::auth::ApiCredentials;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::{ClientEvent, EventReceiver, EventSender};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use gatews_core::{Channel, Request, RequestEvent, Response, Subscription};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request as HandshakeRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, SEC_WEBSOCKET_PROTOCOL};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::{CloseFrame, Message};
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Request ids are shared by every client in the process and never reset.
static REQUEST_ID: AtomicU64 = AtomicU64::new(0);

fn next_request_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Client for the Gate.io push-data API.
///
/// Holds at most one socket. Lifecycle changes and server frames are
/// delivered on the [`EventReceiver`] returned by [`WebSocketClient::new`].
pub struct WebSocketClient {
    config: ClientConfig,
    credentials: Option<ApiCredentials>,
    events: EventSender,
    /// Write queue of the active connection task.
    outbound: Option<mpsc::UnboundedSender<Message>>,
}

impl WebSocketClient {
    pub fn new(config: ClientConfig) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let credentials =
            ApiCredentials::from_parts(config.api_key.as_deref(), config.api_secret.as_deref());

        let client = Self {
            config,
            credentials,
            events,
            outbound: None,
        };
        (client, receiver)
    }

    /// Create a client and connect right away when `auto_connect` is set.
    pub async fn open(config: ClientConfig) -> Result<(Self, EventReceiver), ClientError> {
        let auto_connect = config.auto_connect;
        let (mut client, receiver) = Self::new(config);
        if auto_connect {
            client.connect().await?;
        }
        Ok((client, receiver))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether a socket is open and accepting requests.
    pub fn is_ready(&self) -> bool {
        self.active().is_some()
    }

    fn active(&self) -> Option<&mpsc::UnboundedSender<Message>> {
        self.outbound.as_ref().filter(|tx| !tx.is_closed())
    }

    fn emit(&self, event: ClientEvent) {
        if self.events.send(event).is_err() {
            trace!("Event receiver dropped; event discarded");
        }
    }

    /// Open the socket. Does nothing if one is already active.
    ///
    /// Emits [`ClientEvent::Open`] once the handshake completes. A failed
    /// handshake is returned as [`ClientError::Transport`].
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        if self.is_ready() {
            info!("WebSocket already connected");
            return Ok(());
        }

        let request = self.handshake_request()?;
        let transport = &self.config.transport;
        info!("Connecting to {}", self.config.base_url);

        let (socket, response) = connect_async_with_config(
            request,
            Some(transport.websocket_config()),
            transport.disable_nagle,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "WebSocket handshake failed");
            ClientError::Transport(e)
        })?;

        info!(status = response.status().as_u16(), "WebSocket connected");

        let (tx, rx) = mpsc::unbounded_channel();
        self.outbound = Some(tx);
        self.emit(ClientEvent::Open);

        tokio::spawn(run_connection(socket, rx, self.events.clone()));
        Ok(())
    }

    fn handshake_request(&self) -> Result<HandshakeRequest, ClientError> {
        let mut request = self.config.base_url.as_str().into_client_request()?;

        let protocols = &self.config.transport.protocols;
        if !protocols.is_empty() {
            let value = HeaderValue::from_str(&protocols.join(", "))
                .map_err(|e| ClientError::InvalidHeader(format!("Sec-WebSocket-Protocol: {}", e)))?;
            request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, value);
        }

        Ok(request)
    }

    /// Ask the transport to close the socket. No-op when nothing is connected.
    ///
    /// Completion is reported by [`ClientEvent::Close`].
    pub fn close(&self, code: Option<u16>, reason: Option<&str>) {
        let Some(outbound) = self.active() else {
            return;
        };

        let frame = CloseFrame {
            code: code.map_or(CloseCode::Normal, CloseCode::from),
            reason: reason.unwrap_or_default().to_string().into(),
        };
        info!(code = u16::from(frame.code), "Closing WebSocket");

        if outbound.send(Message::Close(Some(frame))).is_err() {
            debug!("Connection task already stopped");
        }
    }

    /// Build, optionally sign, and send one request. Returns the request id.
    ///
    /// Fails with [`ClientError::NotReady`] when no socket is active and with
    /// [`ClientError::Unauthenticated`] when `signed` is set but the key or
    /// secret is missing. Ids are only consumed once both checks pass.
    pub fn send(
        &self,
        channel: Channel,
        event: Option<RequestEvent>,
        payload: Option<Value>,
        signed: bool,
    ) -> Result<u64, ClientError> {
        let outbound = self.active().ok_or(ClientError::NotReady)?;

        let credentials = if signed {
            let credentials = self.credentials.as_ref().ok_or_else(|| {
                ClientError::Unauthenticated("API Key and Secret are required".to_string())
            })?;
            Some(credentials)
        } else {
            None
        };

        let mut request = Request::new(next_request_id(), Utc::now().timestamp(), channel)
            .with_event(event)
            .with_payload(payload);
        if let Some(credentials) = credentials {
            request.auth = Some(credentials.authorize(&request));
        }

        let text = serde_json::to_string(&request)?;
        debug!(
            id = request.id,
            channel = %channel,
            event = ?request.event,
            signed,
            "Sending request"
        );

        // Only reachable if the connection task exits between the readiness
        // check above and this call; the id drawn for this request is lost.
        outbound
            .send(Message::Text(text))
            .map_err(|_| ClientError::NotReady)?;
        Ok(request.id)
    }

    pub fn subscribe(&self, subscription: &Subscription) -> Result<u64, ClientError> {
        self.send_subscription(subscription, RequestEvent::Subscribe)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> Result<u64, ClientError> {
        self.send_subscription(subscription, RequestEvent::Unsubscribe)
    }

    fn send_subscription(
        &self,
        subscription: &Subscription,
        event: RequestEvent,
    ) -> Result<u64, ClientError> {
        let shaped = subscription.shape();
        self.send(
            subscription.channel(),
            Some(event),
            shaped.payload,
            shaped.requires_auth,
        )
    }

    /// Application-level ping; the server answers on `spot.pong`.
    pub fn ping(&self) -> Result<u64, ClientError> {
        self.send(Channel::Ping, None, None, false)
    }
}

/// Serve one socket until it closes: forward queued writes, answer pings,
/// and turn inbound frames into events.
async fn run_connection(
    mut socket: Socket,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    events: EventSender,
) {
    loop {
        tokio::select! {
            inbound = socket.next() => match inbound {
                Some(Ok(message)) => {
                    if let Err(e) = handle_inbound(&mut socket, message, &events).await {
                        error!(error = %e, "WebSocket transport error");
                        let _ = events.send(ClientEvent::Error(ClientError::Transport(e)));
                        break;
                    }
                }
                Some(Err(e)) => {
                    error!(error = %e, "WebSocket transport error");
                    let _ = events.send(ClientEvent::Error(ClientError::Transport(e)));
                    break;
                }
                None => break,
            },
            queued = outbound.recv() => match queued {
                Some(message) => {
                    if let Err(e) = socket.send(message).await {
                        error!(error = %e, "Failed to write message");
                        let _ = events.send(ClientEvent::Error(ClientError::Transport(e)));
                        break;
                    }
                }
                None => {
                    debug!("Client dropped; closing socket");
                    let _ = socket.close(None).await;
                    break;
                }
            },
        }
    }

    // The client must see the socket as gone before it observes `Close`.
    drop(outbound);
    info!("WebSocket closed");
    let _ = events.send(ClientEvent::Close);
}

async fn handle_inbound(
    socket: &mut Socket,
    message: Message,
    events: &EventSender,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    match message {
        Message::Text(text) => dispatch(decode_frame(text.as_bytes()), events),
        Message::Binary(data) => dispatch(decode_frame(&data), events),
        Message::Ping(_) => {
            // the transport queues the pong; flush it now
            trace!("Ping received");
            socket.flush().await?;
        }
        Message::Close(frame) => debug!(?frame, "Close frame received"),
        Message::Pong(_) | Message::Frame(_) => {}
    }
    Ok(())
}

fn dispatch(event: ClientEvent, events: &EventSender) {
    match &event {
        ClientEvent::Message(response) => {
            debug!(channel = %response.channel, event = %response.event, "Response received");
        }
        ClientEvent::Error(e) => warn!(error = %e, "Error frame received"),
        _ => {}
    }
    let _ = events.send(event);
}

/// Decode one inbound frame into the event it produces.
pub(crate) fn decode_frame(bytes: &[u8]) -> ClientEvent {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            return ClientEvent::Error(ClientError::Decode(format!(
                "frame is not valid UTF-8: {}",
                e
            )))
        }
    };

    match serde_json::from_str::<Response>(text) {
        Ok(response) => match response.into_result() {
            Ok(response) => ClientEvent::Message(response),
            Err(e) => ClientEvent::Error(ClientError::Response(e)),
        },
        Err(e) => ClientEvent::Error(ClientError::Decode(format!(
            "frame is not a response: {}",
            e
        ))),
    }
}
