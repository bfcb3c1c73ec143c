//! Roster and the username/color lookups derived from it.
//!
//! Lookups never fail. A miss falls back to [`UNKNOWN_USERNAME`] or
//! [`DEFAULT_COLOR`] and is not cached, so the next roster sync can fill it.

use std::collections::HashMap;

use localchat_proto::payloads::roster::ClientRecord;

/// Username shown for ids missing from the roster.
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Color used for ids with no assigned color.
pub const DEFAULT_COLOR: &str = "yellow";

/// Last roster reported by the server.
#[derive(Debug, Clone, Default)]
pub struct RosterCache {
    own_id: String,
    clients: Vec<ClientRecord>,
    usernames: HashMap<String, String>,
    colors: HashMap<String, String>,
    own: Option<ClientRecord>,
}

impl RosterCache {
    /// Empty roster for the client identified by `own_id`.
    pub fn new(own_id: impl Into<String>) -> Self {
        Self { own_id: own_id.into(), ..Self::default() }
    }

    /// Swap in a new roster.
    ///
    /// Clears both derived maps and re-derives this client's own record.
    pub fn replace(&mut self, clients: Vec<ClientRecord>) {
        self.usernames.clear();
        self.colors.clear();
        self.own = clients.iter().find(|c| c.client_db_id == self.own_id).cloned();
        self.clients = clients;
    }

    /// Username for a client id, or [`UNKNOWN_USERNAME`].
    pub fn username_for(&mut self, id: &str) -> String {
        if let Some(name) = self.usernames.get(id) {
            return name.clone();
        }

        match self.clients.iter().find(|c| c.client_db_id == id) {
            Some(client) => {
                let name = client.client_username.clone();
                self.usernames.insert(id.to_owned(), name.clone());
                name
            },
            None => UNKNOWN_USERNAME.to_owned(),
        }
    }

    /// Color for a client id, or [`DEFAULT_COLOR`].
    ///
    /// An empty color counts as unassigned.
    pub fn color_for(&mut self, id: &str) -> String {
        if let Some(color) = self.colors.get(id) {
            return color.clone();
        }

        match self.clients.iter().find(|c| c.client_db_id == id && !c.client_color.is_empty()) {
            Some(client) => {
                let color = client.client_color.clone();
                self.colors.insert(id.to_owned(), color.clone());
                color
            },
            None => DEFAULT_COLOR.to_owned(),
        }
    }

    /// This client's record from the current roster.
    pub fn own_record(&self) -> Option<&ClientRecord> {
        self.own.as_ref()
    }
}
