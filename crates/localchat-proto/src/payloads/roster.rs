//! Roster payloads: the client list and profile updates.

use serde::{Deserialize, Serialize};

/// One participant as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    /// Stable client id
    pub client_db_id: String,
    /// Display name
    #[serde(default)]
    pub client_username: String,
    /// Color token, empty when unassigned
    #[serde(default)]
    pub client_color: String,
    /// Opaque profile image reference
    #[serde(default)]
    pub client_profile_image: String,
}

/// Full roster (tag 2, inbound).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientList {
    /// Participants in server order
    pub clients: Vec<ClientRecord>,
}

/// Profile change for this client (tag 3, outbound).
///
/// The server expects the full record, not just the changed field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// This client's id
    pub client_db_id: String,
    /// Username to keep or set
    #[serde(default)]
    pub client_username: String,
    /// Color to keep or set
    #[serde(default)]
    pub client_color: String,
    /// Profile image to keep
    #[serde(default)]
    pub client_profile_image: String,
}

impl From<ClientRecord> for ProfileUpdate {
    fn from(record: ClientRecord) -> Self {
        Self {
            client_db_id: record.client_db_id,
            client_username: record.client_username,
            client_color: record.client_color,
            client_profile_image: record.client_profile_image,
        }
    }
}
