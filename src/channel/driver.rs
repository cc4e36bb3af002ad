//! The channel driver task.
//!
//! [`run`] is the single place where the pure state machine meets the
//! world: it selects over API commands and transport events, feeds them to
//! [`ChannelState::handle`], and performs the resulting actions — sending
//! serialized requests, invoking subscriber callbacks, and updating the
//! connected flag. It exits on close, which is what guarantees that no
//! callback fires after teardown even when events are already queued.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::state::{Action, ChannelState, Input, Notification};
use super::subscriber::RoomEvents;
use crate::domain::RoomId;
use crate::ws::messages::ServerEvent;
use crate::ws::transport::TransportEvent;

/// Commands from the [`super::RoomChannel`] handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Change the desired room.
    SetTarget(Option<RoomId>),
    /// Tear the channel down.
    Close,
}

/// Runs the channel until teardown.
pub(crate) async fn run(
    mut state: ChannelState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    mut transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
    out_tx: mpsc::UnboundedSender<String>,
    connected_tx: watch::Sender<bool>,
    subscriber: Arc<dyn RoomEvents>,
) {
    // The transport task is already spinning up by the time we run.
    apply(
        state.handle(Input::ConnectStarted),
        &out_tx,
        &connected_tx,
        &subscriber,
    );

    loop {
        let input = tokio::select! {
            command = cmd_rx.recv() => match command {
                Some(Command::SetTarget(room)) => Input::SetTarget(room),
                // A dropped handle is teardown too.
                Some(Command::Close) | None => Input::Close,
            },
            event = transport_rx.recv() => match event {
                Some(TransportEvent::Up) => Input::TransportUp,
                Some(TransportEvent::Down) => Input::TransportDown,
                Some(TransportEvent::Frame(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => Input::Event(event),
                        Err(e) => {
                            // Decode-failure tolerance: drop, don't crash.
                            tracing::debug!(error = %e, "dropping undecodable frame");
                            continue;
                        }
                    }
                }
                // Transport task gone; nothing further can ever arrive.
                None => Input::Close,
            },
        };

        let closing = input == Input::Close;
        apply(state.handle(input), &out_tx, &connected_tx, &subscriber);
        if closing {
            break;
        }
    }

    tracing::debug!("room channel closed");
}

/// Performs a batch of actions in order.
fn apply(
    actions: Vec<Action>,
    out_tx: &mpsc::UnboundedSender<String>,
    connected_tx: &watch::Sender<bool>,
    subscriber: &Arc<dyn RoomEvents>,
) {
    for action in actions {
        match action {
            Action::Send(request) => match serde_json::to_string(&request) {
                Ok(json) => {
                    if out_tx.send(json).is_err() {
                        tracing::debug!("transport gone; dropping outbound request");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode outbound request");
                }
            },
            Action::Notify(Notification::Message(message)) => subscriber.on_message(message),
            Action::Notify(Notification::Like(update)) => subscriber.on_like(update),
            Action::Notify(Notification::UserCount(count)) => subscriber.on_user_count(count),
            Action::ConnectedChanged(up) => {
                let _ = connected_tx.send_replace(up);
            }
        }
    }
}
