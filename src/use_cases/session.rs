// Role dispatch for a freshly accepted connection.

use super::publisher::PublisherSession;
use super::registry::LobbyRegistry;
use super::subscriber::SubscriberSession;
use crate::domain::{Role, Transport};
use std::sync::Arc;

/// What the session loop does after handling one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    Close,
}

/// Runs the session for `role` until the peer goes away.
pub async fn run_session<T>(role: Role, transport: T, registry: Arc<LobbyRegistry>)
where
    T: Transport,
{
    match role {
        Role::Publisher => PublisherSession::new(transport, registry).run().await,
        Role::Subscriber => SubscriberSession::new(transport, registry).run().await,
    }
}
