//! WebSocket layer: wire message types and the client transport.
//!
//! The transport owns the persistent connection to the event-stream
//! endpoint, including credential-bearing handshakes and reconnection with
//! bounded backoff. The channel core never touches a socket; it sees only
//! [`transport::TransportEvent`]s.

pub mod messages;
pub(crate) mod transport;
