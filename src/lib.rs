//! # courtside-channel
//!
//! Real-time room channel client for the Courtside intramural-sports
//! platform.
//!
//! This crate owns the one stateful piece of the browser client: the
//! [`channel::RoomChannel`], which keeps a single persistent WebSocket
//! connection to the platform's event-stream endpoint, tracks which cheer
//! room the client is a member of, and turns server-pushed events into typed
//! subscriber callbacks. Rendering, session storage, and ordinary HTTP
//! fetching live elsewhere — this is the protocol core only.
//!
//! ## Architecture
//!
//! ```text
//! Hosting view (UI layer)
//!     │  set_target_room / close / connected()
//!     ▼
//! RoomChannel (channel/)
//!     ├── ChannelState        deterministic lifecycle + membership machine
//!     ├── RoomEvents          subscriber callbacks (on_message, on_like, …)
//!     │
//!     └── Transport (ws/)     tokio-tungstenite connection, cookie auth,
//!                             reconnect with bounded backoff
//! ```
//!
//! The channel core is a pure state machine (`channel::state`) driven by an
//! async task (`channel::driver`); everything network-flavored, including
//! the reconnect policy, is confined to `ws::transport`.

pub mod channel;
pub mod config;
pub mod domain;
pub mod error;
pub mod ws;
