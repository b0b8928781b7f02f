// Domain-level lobby records advertised by publishers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Values a publisher advertises for its lobby.
///
/// Field names follow the wire format used by game servers and clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LobbyInfo {
    pub public_ip_address: String,
    pub port: u16,
    pub max_seats: i32,
    pub players_count: i32,
    pub lobby_name: String,
}

impl LobbyInfo {
    // Seat counts are passed through unchecked; this only feeds diagnostics.
    pub fn is_overbooked(&self) -> bool {
        self.players_count > self.max_seats
    }
}

/// Point-in-time copy of a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyRecord {
    #[serde(rename = "Id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub info: LobbyInfo,
}

/// Which side of the relay a connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Game server advertising a lobby.
    Publisher,
    /// Game client browsing lobbies.
    Subscriber,
}

impl Role {
    /// Handler name used in "unsupported" replies.
    pub fn handler_name(self) -> &'static str {
        match self {
            Role::Publisher => "ServerHandler",
            Role::Subscriber => "ClientHandler",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Publisher => "publisher",
            Role::Subscriber => "subscriber",
        }
    }
}
