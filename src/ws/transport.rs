//! Client WebSocket transport with reconnect.
//!
//! [`spawn_transport`] validates the endpoint and credentials, then runs a
//! background task that keeps one connection to the event-stream endpoint
//! alive: connect, pump frames both ways, and on loss retry with a doubling
//! delay capped at the configured maximum. The channel core observes this
//! purely as [`TransportEvent::Up`] / [`TransportEvent::Down`] edges around
//! a stream of text frames.
//!
//! The transport never interprets frames and never decides what to send;
//! membership requests arrive pre-serialized from the channel driver.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::ChannelConfig;
use crate::error::ChannelError;

/// What the transport reports to the channel driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportEvent {
    /// The connection (or a reconnection) completed its handshake.
    Up,
    /// The connection was lost or a connect attempt failed.
    Down,
    /// A text frame arrived on the current connection.
    Frame(String),
}

/// How a single connected session ended.
enum SessionEnd {
    /// The driver dropped its sender; the channel is being torn down.
    Teardown,
    /// The socket errored or closed; the outer loop should reconnect.
    ConnectionLost,
}

/// Starts the transport task for the given configuration.
///
/// Returns the sender for outbound frames and the receiver for
/// [`TransportEvent`]s. The task runs until the outbound sender is dropped
/// (teardown) or the event receiver is dropped (driver exited).
///
/// # Errors
///
/// Returns [`ChannelError::InvalidEndpoint`] if the endpoint cannot be
/// turned into a handshake request, or [`ChannelError::InvalidSessionCookie`]
/// if the configured cookie is not a valid header value.
pub(crate) fn spawn_transport(
    config: &ChannelConfig,
) -> Result<
    (
        mpsc::UnboundedSender<String>,
        mpsc::UnboundedReceiver<TransportEvent>,
    ),
    ChannelError,
> {
    // Fail fast: the reconnect loop rebuilds this request on every attempt,
    // so validating once here makes the loop infallible.
    build_request(config)?;

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    tokio::spawn(run_transport(config.clone(), out_rx, event_tx));

    Ok((out_tx, event_rx))
}

/// Builds the handshake request, attaching the session cookie if configured.
fn build_request(config: &ChannelConfig) -> Result<Request, ChannelError> {
    let mut request = config.endpoint.as_str().into_client_request().map_err(|e| {
        ChannelError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        }
    })?;

    if let Some(cookie) = &config.session_cookie {
        let value =
            HeaderValue::from_str(cookie).map_err(|_| ChannelError::InvalidSessionCookie)?;
        request.headers_mut().insert(COOKIE, value);
    }

    Ok(request)
}

/// Connect/reconnect loop. One live socket at a time, ever.
async fn run_transport(
    config: ChannelConfig,
    mut out_rx: mpsc::UnboundedReceiver<String>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
) {
    let mut backoff = config.initial_backoff();

    loop {
        let Ok(request) = build_request(&config) else {
            // Validated in spawn_transport; cannot regress while running.
            return;
        };

        match connect_async(request).await {
            Ok((stream, _response)) => {
                backoff = config.initial_backoff();

                // Anything queued while we were down was aimed at the old
                // connection; the channel core re-issues membership itself.
                while out_rx.try_recv().is_ok() {}

                if event_tx.send(TransportEvent::Up).is_err() {
                    return;
                }
                tracing::debug!(endpoint = %config.endpoint, "transport connected");

                match run_session(stream, &mut out_rx, &event_tx).await {
                    SessionEnd::Teardown => return,
                    SessionEnd::ConnectionLost => {}
                }
            }
            Err(e) => {
                tracing::debug!(endpoint = %config.endpoint, error = %e, "connect failed");
            }
        }

        if event_tx.send(TransportEvent::Down).is_err() {
            return;
        }

        tokio::select! {
            () = tokio::time::sleep(backoff) => {}
            outbound = out_rx.recv() => {
                if outbound.is_none() {
                    return;
                }
                // A send while disconnected is dropped; reconnect now.
            }
        }
        backoff = (backoff * 2).min(config.max_backoff());
    }
}

/// Pumps one connected session until the socket drops or teardown.
async fn run_session(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    out_rx: &mut mpsc::UnboundedReceiver<String>,
    event_tx: &mpsc::UnboundedSender<TransportEvent>,
) -> SessionEnd {
    let (mut ws_tx, mut ws_rx) = stream.split();

    loop {
        tokio::select! {
            outbound = out_rx.recv() => match outbound {
                Some(text) => {
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        return SessionEnd::ConnectionLost;
                    }
                }
                None => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return SessionEnd::Teardown;
                }
            },
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let frame = TransportEvent::Frame(text.as_str().to_owned());
                    if event_tx.send(frame).is_err() {
                        return SessionEnd::Teardown;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return SessionEnd::ConnectionLost,
                Some(Ok(_)) => {} // ping/pong/binary: nothing to forward
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "websocket receive error");
                    return SessionEnd::ConnectionLost;
                }
            },
        }
    }
}
