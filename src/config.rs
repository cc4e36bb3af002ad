//! Channel configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The reconnect knobs parameterize the
//! transport layer's backoff; the channel core itself has no retry policy.

use std::time::Duration;

/// Default event-stream endpoint.
const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:3000/ws";

/// Top-level channel configuration.
///
/// Loaded once via [`ChannelConfig::from_env`], or constructed directly
/// (tests do the latter with [`ChannelConfig::new`]).
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket URL of the event-stream endpoint
    /// (e.g. `wss://play.example.edu/ws`).
    pub endpoint: String,

    /// Session cookie sent with the WebSocket handshake. The server
    /// authenticates the channel with the same session used for ordinary
    /// HTTP requests; `None` connects anonymously.
    pub session_cookie: Option<String>,

    /// Initial delay before the first reconnect attempt, in milliseconds.
    pub initial_backoff_ms: u64,

    /// Upper bound on the reconnect delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl ChannelConfig {
    /// Creates a configuration for the given endpoint with default
    /// reconnect bounds and no session cookie.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            session_cookie: None,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 10_000,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or unparsable.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let endpoint = std::env::var("COURTSIDE_WS_URL")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let session_cookie = std::env::var("COURTSIDE_SESSION_COOKIE")
            .ok()
            .filter(|v| !v.is_empty());

        let initial_backoff_ms = parse_env("COURTSIDE_RECONNECT_INITIAL_MS", 1_000);
        let max_backoff_ms = parse_env("COURTSIDE_RECONNECT_MAX_MS", 10_000);

        Self {
            endpoint,
            session_cookie,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Sets the session cookie sent with the handshake.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Initial reconnect delay as a [`Duration`].
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Maximum reconnect delay as a [`Duration`].
    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
