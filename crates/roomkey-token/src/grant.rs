//! Room grants embedded in the `video` claim.

use serde::{Deserialize, Serialize};

/// Capabilities a participant receives in a room.
///
/// This is the explicit configuration value behind a [`Grant`]. The default
/// grants everything, which is what the token endpoint hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Join the room.
    pub room_join: bool,
    /// Publish audio/video tracks.
    pub can_publish: bool,
    /// Receive other participants' tracks.
    pub can_subscribe: bool,
    /// Send data messages.
    pub can_publish_data: bool,
}

impl Capabilities {
    /// Every capability enabled.
    pub const fn all() -> Self {
        Self {
            room_join: true,
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
        }
    }

    /// Join and watch, nothing else.
    pub const fn subscribe_only() -> Self {
        Self {
            room_join: true,
            can_publish: false,
            can_subscribe: true,
            can_publish_data: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Permissions attached to a participant token for exactly one room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    pub room: String,
    pub room_join: bool,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
}

impl Grant {
    /// Scope `capabilities` to `room`.
    pub fn new(room: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            room: room.into(),
            room_join: capabilities.room_join,
            can_publish: capabilities.can_publish,
            can_subscribe: capabilities.can_subscribe,
            can_publish_data: capabilities.can_publish_data,
        }
    }

    /// The capability flags without the room.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            room_join: self.room_join,
            can_publish: self.can_publish,
            can_subscribe: self.can_subscribe,
            can_publish_data: self.can_publish_data,
        }
    }
}

/// Administrative grant carried by the server's own room-API token.
///
/// Unset flags are left out of the serialized claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGrant {
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_create: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_list: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl ServiceGrant {
    /// Grant needed to create and delete rooms.
    pub fn room_create() -> Self {
        Self {
            room_create: true,
            ..Default::default()
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
