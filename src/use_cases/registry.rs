// Shared store of advertised lobbies.

use crate::domain::{LobbyInfo, LobbyRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe registry of advertised lobbies.
///
/// Ownership of each key is enforced by the session and heartbeat use cases,
/// not here. Locks are only held for the duration of a map operation.
#[derive(Debug, Default)]
pub struct LobbyRegistry {
    /// Map of lobby id to the latest advertised values.
    lobbies: RwLock<HashMap<Uuid, LobbyInfo>>,
}

impl LobbyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            lobbies: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts the lobby only if the id is not taken yet.
    pub async fn try_add(&self, id: Uuid, info: LobbyInfo) -> bool {
        let mut lobbies = self.lobbies.write().await;
        if lobbies.contains_key(&id) {
            return false;
        }
        lobbies.insert(id, info);
        true
    }

    /// Overwrites the values of an existing lobby in place.
    ///
    /// Returns false (and changes nothing) when the id is absent.
    pub async fn upsert_fields(&self, id: Uuid, info: LobbyInfo) -> bool {
        let mut lobbies = self.lobbies.write().await;
        match lobbies.get_mut(&id) {
            Some(current) => {
                *current = info;
                true
            }
            None => false,
        }
    }

    /// Inserts or replaces unconditionally.
    pub async fn add_or_update(&self, id: Uuid, info: LobbyInfo) {
        let mut lobbies = self.lobbies.write().await;
        lobbies.insert(id, info);
    }

    /// Returns a snapshot of the lobby, if it exists.
    pub async fn get(&self, id: Uuid) -> Option<LobbyRecord> {
        let lobbies = self.lobbies.read().await;
        lobbies.get(&id).map(|info| LobbyRecord {
            id,
            info: info.clone(),
        })
    }

    /// Point-in-time copy of all lobby ids, in no particular order.
    pub async fn snapshot_keys(&self) -> Vec<Uuid> {
        let lobbies = self.lobbies.read().await;
        lobbies.keys().copied().collect()
    }

    pub async fn remove(&self, id: Uuid) -> Option<LobbyRecord> {
        let mut lobbies = self.lobbies.write().await;
        lobbies.remove(&id).map(|info| LobbyRecord { id, info })
    }

    pub async fn len(&self) -> usize {
        self.lobbies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lobbies.read().await.is_empty()
    }
}
