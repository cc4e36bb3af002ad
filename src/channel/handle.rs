//! Public handle for a live room channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::driver::{self, Command};
use super::state::ChannelState;
use super::subscriber::RoomEvents;
use crate::config::ChannelConfig;
use crate::domain::RoomId;
use crate::error::ChannelError;
use crate::ws::transport;

/// A live channel to the event-stream endpoint.
///
/// Owns exactly one transport connection for its whole life. Created when
/// the hosting view mounts, torn down (via [`RoomChannel::close`] or drop)
/// when it unmounts. All methods return immediately; their effects happen
/// on the channel's background tasks.
#[derive(Debug)]
pub struct RoomChannel {
    cmd_tx: mpsc::UnboundedSender<Command>,
    connected_rx: watch::Receiver<bool>,
}

impl RoomChannel {
    /// Opens a channel and starts connecting.
    ///
    /// If `initial_room` is set, a join request is sent as soon as the
    /// connection is up. The subscriber is borrowed for the channel's
    /// lifetime and never called again after [`RoomChannel::close`].
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the configured endpoint or session
    /// cookie cannot form a valid handshake request. Connection failures
    /// after that are not errors; they surface on the connected flag while
    /// the transport retries.
    pub fn connect(
        config: &ChannelConfig,
        subscriber: Arc<dyn RoomEvents>,
        initial_room: Option<RoomId>,
    ) -> Result<Self, ChannelError> {
        let (out_tx, transport_rx) = transport::spawn_transport(config)?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (connected_tx, connected_rx) = watch::channel(false);

        tokio::spawn(driver::run(
            ChannelState::new(initial_room),
            cmd_rx,
            transport_rx,
            out_tx,
            connected_tx,
            subscriber,
        ));

        Ok(Self {
            cmd_tx,
            connected_rx,
        })
    }

    /// Changes the desired room (`None` leaves without joining another).
    ///
    /// While connected, a switch sends leave-then-join in that order; while
    /// disconnected, only the target is recorded and the join is deferred
    /// to the next successful connect. Setting the current target again is
    /// a no-op. Fire-and-forget: there is no acknowledgement to report.
    pub fn set_target_room(&self, room: Option<RoomId>) {
        let _ = self.cmd_tx.send(Command::SetTarget(room));
    }

    /// Returns an observable for the UI-facing connected flag.
    ///
    /// The flag is `false` from creation until the first handshake, during
    /// reconnects, and permanently after close.
    #[must_use]
    pub fn connected(&self) -> watch::Receiver<bool> {
        self.connected_rx.clone()
    }

    /// Current value of the connected flag.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.connected_rx.borrow()
    }

    /// Tears the channel down.
    ///
    /// Idempotent and safe to call in any state, including mid-connect.
    /// Guarantees that no subscriber callback fires afterwards, even for
    /// events already in flight on the transport.
    pub fn close(&self) {
        let _ = self.cmd_tx.send(Command::Close);
    }
}

impl Drop for RoomChannel {
    fn drop(&mut self) {
        self.close();
    }
}
