//! Connection lifecycle and room membership state machine.
//!
//! [`ChannelState`] is a pure, deterministic machine: every transport edge,
//! API call, and inbound event is an [`Input`], and each input produces the
//! [`Action`]s the driver must perform. No I/O happens here, which is what
//! makes the membership protocol testable without a socket.
//!
//! Membership is optimistic: the machine records the last room the client
//! *asked* to join. The protocol has no join acknowledgement, so there is
//! nothing stronger to track.

use crate::domain::{ChatMessage, LikeUpdate, RoomId};
use crate::ws::messages::{ClientRequest, ServerEvent};

/// Connection lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Created, transport not yet started.
    Idle,
    /// First connection attempt in flight.
    Connecting,
    /// Transport handshake completed.
    Connected,
    /// Transport lost; the transport layer is retrying on its own.
    Disconnected,
    /// Torn down. Terminal: no input has any effect past this point.
    Closed,
}

/// Everything that can happen to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    /// The transport task was started.
    ConnectStarted,
    /// The transport completed a handshake (first connect or reconnect).
    TransportUp,
    /// The transport lost its connection, or a connect attempt failed.
    TransportDown,
    /// The hosting view changed the desired room (`None` = no room).
    SetTarget(Option<RoomId>),
    /// A decoded server event arrived.
    Event(ServerEvent),
    /// Explicit teardown.
    Close,
}

/// A callback the driver must invoke on the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notification {
    /// Deliver a chat message.
    Message(ChatMessage),
    /// Deliver a like update.
    Like(LikeUpdate),
    /// Deliver the combined participant count.
    UserCount(u32),
}

/// What the driver must do in response to an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Serialize and send a request on the transport.
    Send(ClientRequest),
    /// Invoke a subscriber callback.
    Notify(Notification),
    /// The UI-facing connected flag changed.
    ConnectedChanged(bool),
}

/// The channel's complete state: lifecycle phase plus believed membership.
#[derive(Debug)]
pub(crate) struct ChannelState {
    phase: Phase,
    /// Last room the client asked the server to join (`None` = no room).
    target: Option<RoomId>,
}

impl ChannelState {
    /// Creates a machine in [`Phase::Idle`] with the given initial target.
    pub(crate) fn new(initial_room: Option<RoomId>) -> Self {
        Self {
            phase: Phase::Idle,
            target: initial_room,
        }
    }

    /// Processes one input and returns the actions it requires, in order.
    pub(crate) fn handle(&mut self, input: Input) -> Vec<Action> {
        // Terminal: teardown silences everything, including repeat closes.
        if self.phase == Phase::Closed {
            return Vec::new();
        }

        match input {
            Input::ConnectStarted => {
                if self.phase == Phase::Idle {
                    self.phase = Phase::Connecting;
                }
                Vec::new()
            }

            Input::TransportUp => {
                if self.phase == Phase::Connected {
                    return Vec::new();
                }
                self.phase = Phase::Connected;
                let mut actions = vec![Action::ConnectedChanged(true)];
                // The server drops all room state with a lost connection, so
                // a reconnect re-joins the current target without a leave.
                if let Some(room) = self.target {
                    actions.push(Action::Send(ClientRequest::JoinRoom { room_id: room }));
                }
                actions
            }

            Input::TransportDown => match self.phase {
                Phase::Connecting | Phase::Connected => {
                    self.phase = Phase::Disconnected;
                    vec![Action::ConnectedChanged(false)]
                }
                _ => Vec::new(),
            },

            Input::SetTarget(room) => {
                if room == self.target {
                    return Vec::new();
                }
                let previous = self.target;
                self.target = room;
                if self.phase != Phase::Connected {
                    // Deferred: the next TransportUp joins whatever the
                    // target is then. Earlier targets are superseded.
                    return Vec::new();
                }
                let mut actions = Vec::new();
                if previous.is_some() {
                    actions.push(Action::Send(ClientRequest::LeaveRoom));
                }
                if let Some(new_room) = room {
                    actions.push(Action::Send(ClientRequest::JoinRoom { room_id: new_room }));
                }
                actions
            }

            Input::Event(event) => {
                let notification = match event {
                    ServerEvent::ChatMessage(message) => Notification::Message(message),
                    ServerEvent::LikeUpdate(update) => Notification::Like(update),
                    ServerEvent::ParticipantCount { anonymous, member } => {
                        Notification::UserCount(anonymous + member)
                    }
                };
                vec![Action::Notify(notification)]
            }

            Input::Close => {
                self.phase = Phase::Closed;
                vec![Action::ConnectedChanged(false)]
            }
        }
    }
}
