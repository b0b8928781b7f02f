// Publisher (game server) session: owns at most one registry record.

use super::registry::LobbyRegistry;
use super::session::SessionControl;
use crate::domain::{Command, LobbyInfo, LobbyPayload, Response, Role, Transport, TransportError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-connection state for a game server advertising its lobby.
///
/// The record is keyed by the session id and lives exactly as long as the
/// session: every exit path funnels through [`PublisherSession::close`].
pub struct PublisherSession<T> {
    id: Uuid,
    transport: T,
    registry: Arc<LobbyRegistry>,
    // Whether this session inserted the record under `id`.
    owns_record: bool,
    closed: bool,
}

impl<T> PublisherSession<T>
where
    T: Transport,
{
    pub fn new(transport: T, registry: Arc<LobbyRegistry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            registry,
            owns_record: false,
            closed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Serves commands until the peer closes, fails, or sends a corrupt post.
    pub async fn run(mut self) {
        info!(
            session_id = %self.id,
            peer = %self.transport.peer_identity(),
            "publisher connected"
        );

        loop {
            let command = match self.transport.receive_command().await {
                Ok(command) => command,
                Err(TransportError::Closed) => {
                    info!(session_id = %self.id, "publisher closed connection");
                    break;
                }
                Err(e) => {
                    warn!(session_id = %self.id, error = %e, "publisher transport failed");
                    break;
                }
            };

            if self.handle(command).await == SessionControl::Close {
                break;
            }
        }

        self.close().await;
    }

    async fn handle(&mut self, command: Command) -> SessionControl {
        debug!(session_id = %self.id, command = ?command.type_name(), "publisher command");
        match command {
            Command::Close => {
                info!(session_id = %self.id, "publisher requested close");
                SessionControl::Close
            }
            Command::GetStatus => self.reply(Response::Status).await,
            Command::PostLobbyInfo(LobbyPayload::Record(info)) => {
                self.post(info).await;
                SessionControl::Continue
            }
            Command::PostLobbyInfo(LobbyPayload::Malformed(raw)) => {
                // Fail closed: the owned record goes away with the connection.
                warn!(
                    session_id = %self.id,
                    content = %raw,
                    "corrupt lobby info; dropping publisher"
                );
                SessionControl::Close
            }
            Command::Unknown => self.reply(Response::UnknownCommand).await,
            other => {
                info!(session_id = %self.id, command = ?other.type_name(), "unsupported command");
                self.reply(Response::unsupported(&other, Role::Publisher)).await
            }
        }
    }

    async fn post(&mut self, info: LobbyInfo) {
        if info.is_overbooked() {
            debug!(
                session_id = %self.id,
                players = info.players_count,
                seats = info.max_seats,
                "lobby reports more players than seats"
            );
        }

        if self.owns_record {
            if self.registry.upsert_fields(self.id, info.clone()).await {
                debug!(session_id = %self.id, "lobby info updated");
                return;
            }
            // Only reachable if something outside this session removed the key.
            warn!(session_id = %self.id, "owned lobby missing; registering again");
        }

        self.owns_record = self.registry.try_add(self.id, info).await;
        if self.owns_record {
            info!(session_id = %self.id, "lobby registered");
        } else {
            warn!(session_id = %self.id, "lobby id already registered by another owner");
        }
    }

    async fn reply(&mut self, response: Response) -> SessionControl {
        match self.transport.send_response(&response).await {
            Ok(()) => SessionControl::Continue,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "failed to reply to publisher");
                SessionControl::Close
            }
        }
    }

    /// Removes the owned record and closes the transport. Runs at most once.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.owns_record {
            self.owns_record = false;
            if self.registry.remove(self.id).await.is_some() {
                info!(session_id = %self.id, "lobby removed");
            }
        }

        self.transport.close().await;
        info!(session_id = %self.id, "publisher session closed");
    }
}
