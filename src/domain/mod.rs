// Domain layer: lobby records, commands and the transport port.

pub mod command;
pub mod errors;
pub mod lobby;
pub mod ports;

pub use command::{Command, LobbyKey, LobbyPayload, RawContent, Response};
pub use errors::{LookupError, TransportError};
pub use lobby::{LobbyInfo, LobbyRecord, Role};
pub use ports::Transport;
