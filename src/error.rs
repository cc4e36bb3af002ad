//! Channel error types.
//!
//! [`ChannelError`] covers the only fallible surface the channel exposes:
//! validating the endpoint and credentials when a [`crate::channel::RoomChannel`]
//! is created. Connection churn after that point is expected, not
//! exceptional — it shows up on the connected flag, never as an error —
//! and malformed inbound frames are logged and dropped.

/// Errors raised when constructing a channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The configured endpoint could not be turned into a WebSocket
    /// handshake request (bad URL scheme, missing host, …).
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// The offending endpoint string.
        endpoint: String,
        /// Why the handshake request could not be built.
        reason: String,
    },

    /// The session cookie contains bytes that are not valid in an HTTP
    /// header value.
    #[error("session cookie is not a valid header value")]
    InvalidSessionCookie,
}
