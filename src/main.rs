//! courtside-channel room tailer.
//!
//! Connects to the configured event-stream endpoint, joins the room given
//! as the first argument (omit it to stay in no room), and logs everything
//! the channel delivers until Ctrl-C. Handy as a smoke test against a live
//! server.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use courtside_channel::channel::{RoomChannel, RoomEvents};
use courtside_channel::config::ChannelConfig;
use courtside_channel::domain::{ChatMessage, LikeUpdate, RoomId};

/// Subscriber that logs every callback.
struct LogSubscriber;

impl RoomEvents for LogSubscriber {
    fn on_message(&self, message: ChatMessage) {
        tracing::info!(
            room = %message.room_id,
            author = %message.author,
            body = %message.body,
            "message"
        );
    }

    fn on_like(&self, update: LikeUpdate) {
        tracing::info!(
            message = %update.message_id,
            likes = update.liker_ids.len(),
            "likes updated"
        );
    }

    fn on_user_count(&self, count: u32) {
        tracing::info!(count, "participants");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ChannelConfig::from_env();

    let room: Option<RoomId> = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("room id must be an integer")?;

    tracing::info!(endpoint = %config.endpoint, room = ?room, "starting room tailer");

    let channel = RoomChannel::connect(&config, Arc::new(LogSubscriber), room)
        .context("failed to open room channel")?;

    // Log connection status edges alongside the room events.
    let mut connected = channel.connected();
    tokio::spawn(async move {
        while connected.changed().await.is_ok() {
            let up = *connected.borrow();
            tracing::info!(connected = up, "connection status");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    channel.close();
    tracing::info!("room tailer stopped");

    Ok(())
}
