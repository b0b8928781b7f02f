// Subscriber (game client) session: read-only view of the registry.

use super::queries::{find_lobby, lobby_ids};
use super::registry::LobbyRegistry;
use super::session::SessionControl;
use crate::domain::{Command, LobbyKey, Response, Role, Transport, TransportError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct SubscriberSession<T> {
    id: Uuid,
    transport: T,
    registry: Arc<LobbyRegistry>,
    closed: bool,
}

impl<T> SubscriberSession<T>
where
    T: Transport,
{
    pub fn new(transport: T, registry: Arc<LobbyRegistry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            registry,
            closed: false,
        }
    }

    /// Serves queries until the peer closes or the transport fails.
    pub async fn run(mut self) {
        info!(
            session_id = %self.id,
            peer = %self.transport.peer_identity(),
            "subscriber connected"
        );

        loop {
            let command = match self.transport.receive_command().await {
                Ok(command) => command,
                Err(TransportError::Closed) => {
                    info!(session_id = %self.id, "subscriber closed connection");
                    break;
                }
                Err(e) => {
                    warn!(session_id = %self.id, error = %e, "subscriber transport failed");
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
        debug!(session_id = %self.id, command = ?command.type_name(), "subscriber command");
        match command {
            Command::Close => {
                info!(session_id = %self.id, "subscriber requested close");
                SessionControl::Close
            }
            Command::GetStatus => self.reply(Response::Status).await,
            Command::GetLobbyGuids => {
                let ids = lobby_ids(&self.registry).await;
                debug!(session_id = %self.id, count = ids.len(), "sending lobby ids");
                self.reply(Response::LobbyIds(ids)).await
            }
            Command::GetLobbyInfo(key) => self.lobby_info(key).await,
            Command::Unknown => self.reply(Response::UnknownCommand).await,
            other => {
                info!(session_id = %self.id, command = ?other.type_name(), "unsupported command");
                self.reply(Response::unsupported(&other, Role::Subscriber)).await
            }
        }
    }

    async fn lobby_info(&mut self, key: LobbyKey) -> SessionControl {
        let response = match find_lobby(&self.registry, &key).await {
            Ok(record) => Response::Lobby(record),
            Err(e) => {
                info!(session_id = %self.id, error = %e, "lobby lookup failed");
                Response::LookupFailed(e)
            }
        };
        self.reply(response).await
    }

    async fn reply(&mut self, response: Response) -> SessionControl {
        match self.transport.send_response(&response).await {
            Ok(()) => SessionControl::Continue,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "failed to reply to subscriber");
                SessionControl::Close
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.transport.close().await;
        info!(session_id = %self.id, "subscriber session closed");
    }
}
