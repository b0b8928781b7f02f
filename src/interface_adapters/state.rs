use crate::use_cases::HeartbeatLobbies;
use std::sync::Arc;

/// Shared state behind both RPC routers.
#[derive(Clone)]
pub struct RpcState {
    // Heartbeat ownership plus the registry it writes to.
    pub lobbies: Arc<HeartbeatLobbies>,
}
