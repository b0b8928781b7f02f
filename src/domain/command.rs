// Commands peers send and the typed responses sessions produce.

use super::errors::LookupError;
use super::lobby::{LobbyInfo, LobbyRecord, Role};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// `Content` that did not parse into the shape its command expects.
///
/// Only built by [`LobbyPayload::from_content`] and [`LobbyKey::from_content`],
/// so re-classifying the held value always yields the same malformed variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RawContent(Value);

impl RawContent {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for RawContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Content of a `PostLobbyInfo` command.
#[derive(Debug, Clone, PartialEq)]
pub enum LobbyPayload {
    Record(LobbyInfo),
    Malformed(RawContent),
}

impl LobbyPayload {
    /// Classifies raw content. It may be an embedded object or a JSON
    /// document serialized as a string.
    pub fn from_content(content: Value) -> Self {
        let parsed = match &content {
            Value::String(text) => serde_json::from_str::<LobbyInfo>(text).ok(),
            Value::Object(_) => serde_json::from_value::<LobbyInfo>(content.clone()).ok(),
            _ => None,
        };

        match parsed {
            Some(info) => LobbyPayload::Record(info),
            None => LobbyPayload::Malformed(RawContent(content)),
        }
    }
}

/// Content of a `GetLobbyInfo` command.
#[derive(Debug, Clone, PartialEq)]
pub enum LobbyKey {
    Id(Uuid),
    Malformed(RawContent),
}

impl LobbyKey {
    /// Classifies raw content. Surrounding whitespace around an id is ignored.
    pub fn from_content(content: Value) -> Self {
        if let Value::String(text) = &content
            && let Ok(id) = Uuid::parse_str(text.trim())
        {
            return LobbyKey::Id(id);
        }
        LobbyKey::Malformed(RawContent(content))
    }
}

/// Every command a peer can send, plus `Unknown` for anything undecodable.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Close,
    GetStatus,
    PostLobbyInfo(LobbyPayload),
    GetLobbyGuids,
    GetLobbyInfo(LobbyKey),
    Unknown,
}

impl Command {
    /// Wire name of the command type, `None` for `Unknown`.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Command::Close => Some("Close"),
            Command::GetStatus => Some("GetStatus"),
            Command::PostLobbyInfo(_) => Some("PostLobbyInfo"),
            Command::GetLobbyGuids => Some("GetLobbyGuids"),
            Command::GetLobbyInfo(_) => Some("GetLobbyInfo"),
            Command::Unknown => None,
        }
    }
}

/// Replies a session sends back over its transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Status,
    UnknownCommand,
    Unsupported { command: &'static str, role: Role },
    LobbyIds(Vec<Uuid>),
    Lobby(LobbyRecord),
    LookupFailed(LookupError),
}

impl Response {
    /// Reply for a decodable command the given role does not handle.
    pub fn unsupported(command: &Command, role: Role) -> Self {
        match command.type_name() {
            Some(command) => Response::Unsupported { command, role },
            None => Response::UnknownCommand,
        }
    }
}
