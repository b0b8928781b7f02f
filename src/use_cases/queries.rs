// Read-only lobby queries shared by every subscriber-facing transport.

use super::registry::LobbyRegistry;
use crate::domain::{LobbyKey, LobbyRecord, LookupError};
use serde_json::Value;
use uuid::Uuid;

pub async fn lobby_ids(registry: &LobbyRegistry) -> Vec<Uuid> {
    registry.snapshot_keys().await
}

/// Resolves a lobby key to the current record.
pub async fn find_lobby(
    registry: &LobbyRegistry,
    key: &LobbyKey,
) -> Result<LobbyRecord, LookupError> {
    let id = match key {
        LobbyKey::Id(id) => *id,
        LobbyKey::Malformed(raw) => {
            return Err(LookupError::MalformedId(raw.as_value().clone()));
        }
    };

    registry.get(id).await.ok_or(LookupError::NotFound(id))
}

/// Parses a textual lobby id, keeping the raw text when it is not a UUID.
pub fn parse_lobby_key(raw: &str) -> LobbyKey {
    LobbyKey::from_content(Value::String(raw.to_string()))
}
