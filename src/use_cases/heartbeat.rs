// Heartbeat-driven lobby ownership for stateless (RPC) publishers.

use super::registry::LobbyRegistry;
use crate::domain::LobbyInfo;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;

/// Lobby owned by one remote peer, kept alive by repeated posts.
#[derive(Debug, Clone, Copy)]
struct PeerHeartbeat {
    lobby_id: Uuid,
    // Set by every post, cleared by every sweep.
    fresh_since_last_sweep: bool,
}

/// Tracks which peer owns which lobby when there is no persistent connection
/// to watch for EOF.
///
/// A peer that stops posting survives the first sweep after its last post
/// (which clears its flag) and is evicted by the second one. Lock order is
/// always peers table, then registry.
#[derive(Debug)]
pub struct HeartbeatLobbies {
    registry: Arc<LobbyRegistry>,
    /// Keyed by transport-level peer identity.
    peers: Mutex<HashMap<String, PeerHeartbeat>>,
}

impl HeartbeatLobbies {
    pub fn new(registry: Arc<LobbyRegistry>) -> Self {
        Self {
            registry,
            peers: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<LobbyRegistry> {
        &self.registry
    }

    /// Creates or refreshes the peer's lobby and marks the peer as alive.
    pub async fn post(&self, peer: &str, info: LobbyInfo) -> Uuid {
        let mut peers = self.peers.lock().await;
        let entry = peers.entry(peer.to_string()).or_insert_with(|| PeerHeartbeat {
            lobby_id: Uuid::new_v4(),
            fresh_since_last_sweep: false,
        });

        self.registry.add_or_update(entry.lobby_id, info).await;
        entry.fresh_since_last_sweep = true;

        debug!(peer, lobby_id = %entry.lobby_id, "lobby info added or updated");
        entry.lobby_id
    }

    /// Removes the peer's lobby right away. Returns the id if a record was removed.
    pub async fn drop_lobby(&self, peer: &str) -> Option<Uuid> {
        let mut peers = self.peers.lock().await;
        let status = peers.remove(peer)?;
        let removed = self.registry.remove(status.lobby_id).await?;

        info!(peer, lobby_id = %removed.id, "lobby dropped by peer");
        Some(removed.id)
    }

    /// One eviction pass. Returns the ids of evicted lobbies.
    pub async fn sweep(&self) -> Vec<Uuid> {
        let mut peers = self.peers.lock().await;

        let stale: Vec<String> = peers
            .iter()
            .filter(|(_, status)| !status.fresh_since_last_sweep)
            .map(|(peer, _)| peer.clone())
            .collect();

        let mut evicted = Vec::with_capacity(stale.len());
        for peer in stale {
            let Some(status) = peers.remove(&peer) else {
                continue;
            };
            if self.registry.remove(status.lobby_id).await.is_some() {
                info!(peer = %peer, lobby_id = %status.lobby_id, "lobby is dead; removed");
                evicted.push(status.lobby_id);
            }
        }

        for status in peers.values_mut() {
            status.fresh_since_last_sweep = false;
        }

        evicted
    }

    /// Forgets every peer along with the lobbies they own.
    pub async fn clear(&self) {
        let mut peers = self.peers.lock().await;
        for (_, status) in peers.drain() {
            self.registry.remove(status.lobby_id).await;
        }
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.lock().await.len()
    }

    /// Spawns the periodic sweep. The first sweep runs immediately.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> SweeperHandle {
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(sweep_task(self, interval, shutdown.clone()));
        SweeperHandle { shutdown, task }
    }
}

async fn sweep_task(lobbies: Arc<HeartbeatLobbies>, period: Duration, shutdown: Arc<Notify>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_ms = period.as_millis() as u64, "heartbeat sweeper started");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("heartbeat sweeper stopped");
                break;
            }
            _ = ticker.tick() => {
                let evicted = lobbies.sweep().await;
                if !evicted.is_empty() {
                    info!(count = evicted.len(), "evicted silent lobbies");
                }
            }
        }
    }
}

/// Handle to a running sweeper task.
pub struct SweeperHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn stop(&self) {
        // notify_one keeps a permit if the task is mid-sweep.
        self.shutdown.notify_one();
    }

    /// Stops the sweeper and waits for the task to finish.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}
