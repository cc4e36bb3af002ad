//! Subscriber callback interface.
//!
//! A fixed capability set replaces the original client's duck-typed
//! callback object: the hosting view implements [`RoomEvents`] and hands
//! the channel an `Arc` of it for the channel's lifetime.

use crate::domain::{ChatMessage, LikeUpdate};

/// Callbacks the channel invokes as room events arrive.
///
/// All methods are called from the channel's driver task, in transport
/// delivery order, at arbitrary points relative to the caller's own code.
/// After [`crate::channel::RoomChannel::close`] no method is ever called
/// again, even for events already in flight.
pub trait RoomEvents: Send + Sync {
    /// A chat message was posted in the current room.
    fn on_message(&self, message: ChatMessage);

    /// The like set of a message changed. The update carries the full set
    /// of liking users; reconciling it idempotently against local state is
    /// the implementor's job.
    fn on_like(&self, update: LikeUpdate);

    /// The combined participant count (anonymous + member) changed.
    /// Optional; the default implementation ignores it.
    fn on_user_count(&self, _count: u32) {}
}
