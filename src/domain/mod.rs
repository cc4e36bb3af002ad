//! Domain layer: typed identifiers and room event payloads.
//!
//! This module contains the client-side domain model: room, message, and
//! user identity plus the payloads the channel hands to its subscriber.

pub mod chat;
pub mod room_id;

pub use chat::{ChatMessage, LikeUpdate, MessageId, UserId};
pub use room_id::RoomId;
