// Domain-level errors for relay sessions.

use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Failures reading from or writing to a peer. Sessions treat all of them as
/// an implicit close.
#[derive(Debug)]
pub enum TransportError {
    // Peer closed its side of the connection.
    Closed,
    Io(std::io::Error),
    // A single burst exceeded the configured message cap.
    Oversized { limit: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Closed => write!(f, "connection closed by peer"),
            TransportError::Io(e) => write!(f, "socket error: {e}"),
            TransportError::Oversized { limit } => {
                write!(f, "message exceeds {limit} bytes")
            }
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e)
    }
}

/// Recoverable lookup failures reported back to subscribers as text.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    MalformedId(Value),
    NotFound(Uuid),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::MalformedId(Value::String(raw)) => {
                write!(f, "Can't parse lobby id from message: {raw}")
            }
            LookupError::MalformedId(raw) => {
                write!(f, "Can't parse lobby id from message: {raw}")
            }
            LookupError::NotFound(id) => write!(f, "Can't find lobby with id: {id}."),
        }
    }
}
