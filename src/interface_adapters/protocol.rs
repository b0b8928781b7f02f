// Wire codec for the stream transport.
// Commands are JSON objects `{"Type": .., "Content": ..}`; responses are plain
// text literals or JSON bodies, one per write.

use crate::domain::{Command, LobbyKey, LobbyPayload, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: &str = "OK";
pub const UNKNOWN_COMMAND: &str = "Unknown Command";

/// Raw command envelope as it appears on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct CommandEnvelope {
    // Kept untyped so an unexpected tag decodes to `Unknown` instead of failing.
    #[serde(rename = "Type", default)]
    kind: Value,
    #[serde(rename = "Content", default)]
    content: Value,
}

/// Encodes a command into its wire form.
pub fn encode(command: &Command) -> Vec<u8> {
    let content = match command {
        Command::PostLobbyInfo(LobbyPayload::Record(info)) => {
            serde_json::to_value(info).unwrap_or_default()
        }
        Command::PostLobbyInfo(LobbyPayload::Malformed(raw)) => raw.as_value().clone(),
        Command::GetLobbyInfo(LobbyKey::Id(id)) => Value::String(id.to_string()),
        Command::GetLobbyInfo(LobbyKey::Malformed(raw)) => raw.as_value().clone(),
        _ => Value::Null,
    };
    let kind = command
        .type_name()
        .map(|name| Value::String(name.to_string()))
        .unwrap_or(Value::Null);

    serde_json::to_vec(&CommandEnvelope { kind, content }).unwrap_or_default()
}

/// Decodes one wire message. Anything unrecognised becomes `Command::Unknown`.
pub fn decode(bytes: &[u8]) -> Command {
    let envelope: CommandEnvelope = match serde_json::from_slice(bytes.trim_ascii()) {
        Ok(envelope) => envelope,
        Err(_) => return Command::Unknown,
    };
    let Value::String(kind) = envelope.kind else {
        return Command::Unknown;
    };

    match kind.as_str() {
        "Close" => Command::Close,
        "GetStatus" => Command::GetStatus,
        "PostLobbyInfo" => Command::PostLobbyInfo(LobbyPayload::from_content(envelope.content)),
        "GetLobbyGuids" => Command::GetLobbyGuids,
        "GetLobbyInfo" => Command::GetLobbyInfo(LobbyKey::from_content(envelope.content)),
        _ => Command::Unknown,
    }
}

/// Encodes a session response into the bytes written back to the peer.
pub fn encode_response(response: &Response) -> Vec<u8> {
    match response {
        Response::Status => STATUS_OK.as_bytes().to_vec(),
        Response::UnknownCommand => UNKNOWN_COMMAND.as_bytes().to_vec(),
        Response::Unsupported { command, role } => {
            format!("{command} is unsupported for {}!", role.handler_name()).into_bytes()
        }
        Response::LobbyIds(ids) => serde_json::to_vec(ids).unwrap_or_default(),
        Response::Lobby(record) => serde_json::to_vec(record).unwrap_or_default(),
        Response::LookupFailed(error) => error.to_string().into_bytes(),
    }
}
