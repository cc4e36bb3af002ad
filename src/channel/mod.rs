//! The room channel core: lifecycle, membership, and event dispatch.
//!
//! [`RoomChannel`] is the public face; underneath, a pure state machine
//! (`state`) decides everything and a driver task (`driver`) carries the
//! decisions out against the transport and the subscriber.

pub(crate) mod driver;
pub mod handle;
pub(crate) mod state;
pub mod subscriber;

pub use handle::RoomChannel;
pub use subscriber::RoomEvents;
