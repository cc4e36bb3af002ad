//! Wire message types: client requests and server events.
//!
//! Both directions are internally tagged JSON (`"type"` discriminator in
//! `snake_case`). Transport-level connect/disconnect are not wire messages;
//! they surface as [`super::transport::TransportEvent`] variants instead.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, LikeUpdate, RoomId};

/// Requests the client sends to the server.
///
/// Fire-and-forget: the protocol defines no acknowledgement for either
/// request, so room membership is client-believed, never server-confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Join the given room, implicitly leaving any room the server still
    /// has this connection in.
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
    },
    /// Leave the current room. Carries no argument; the server infers the
    /// room from the connection's membership.
    LeaveRoom,
}

/// Events the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A chat message was posted in the client's room.
    ChatMessage(ChatMessage),
    /// The like set of a message changed.
    LikeUpdate(LikeUpdate),
    /// The room's participant count changed. Anonymous spectators and
    /// signed-in members are reported separately; the channel sums them
    /// before forwarding.
    ParticipantCount {
        /// Connected spectators without a session.
        anonymous: u32,
        /// Connected signed-in members.
        member: u32,
    },
}
