//! Type-safe room identifier.
//!
//! [`RoomId`] is a newtype wrapper around the integer room id the server
//! assigns to each cheer room, providing type safety so that room
//! identifiers cannot be confused with other integers on the wire.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a cheer room.
///
/// Wraps the server-assigned integer id. Used as the argument of join
/// requests and carried on every chat message so the subscriber can tell
/// which room an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    /// Creates a `RoomId` from a raw integer id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer id.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RoomId> for i64 {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl FromStr for RoomId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serde_is_transparent() {
        let id = RoomId::new(7);
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("7"));

        let parsed: Option<RoomId> = serde_json::from_str("7").ok();
        assert_eq!(parsed, Some(id));
    }

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(RoomId::new(42).to_string(), "42");
    }

    #[test]
    fn from_str_parses_integers() {
        let id: Option<RoomId> = "12".parse().ok();
        assert_eq!(id, Some(RoomId::new(12)));
        assert!("lobby".parse::<RoomId>().is_err());
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = RoomId::new(3);
        let mut map = HashMap::new();
        map.insert(id, "volleyball");
        assert_eq!(map.get(&id), Some(&"volleyball"));
    }
}
