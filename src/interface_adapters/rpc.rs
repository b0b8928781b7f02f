// JSON-over-HTTP transport. Publishers keep their lobby alive by re-posting;
// subscribers read the shared registry.

use crate::domain::LobbyInfo;
use crate::interface_adapters::http::{DropLobbyResponse, ErrorResponse};
use crate::interface_adapters::state::RpcState;
use crate::use_cases::queries::{find_lobby, lobby_ids, parse_lobby_key};

use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{debug, warn};
use uuid::Uuid;

pub const SUBSCRIBER_HINT: &str =
    "Lobby relay is up. GET /lobbies lists lobby ids, GET /lobbies/{id} returns one lobby.";

pub fn publisher_routes(state: RpcState) -> Router {
    Router::new()
        .route("/lobby", post(post_lobby).delete(drop_lobby))
        .with_state(state)
}

pub fn subscriber_routes(state: RpcState) -> Router {
    Router::new()
        .route("/", get(hint))
        .route("/lobbies", get(list_lobbies))
        .route("/lobbies/{id}", get(lobby_info))
        .with_state(state)
}

async fn post_lobby(
    State(state): State<RpcState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<LobbyInfo>, JsonRejection>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let Json(info) = payload.map_err(|rejection| {
        warn!(%peer, error = %rejection.body_text(), "rejected lobby post");
        (
            rejection.status(),
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    let lobby_id = state.lobbies.post(&peer.to_string(), info).await;
    debug!(%peer, %lobby_id, "lobby heartbeat");
    Ok(Json(json!({})))
}

async fn drop_lobby(
    State(state): State<RpcState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Json<DropLobbyResponse> {
    let success = state.lobbies.drop_lobby(&peer.to_string()).await.is_some();
    Json(DropLobbyResponse { success })
}

async fn hint() -> &'static str {
    SUBSCRIBER_HINT
}

async fn list_lobbies(State(state): State<RpcState>) -> Json<Vec<Uuid>> {
    Json(lobby_ids(state.lobbies.registry()).await)
}

// Unknown or malformed ids answer with an empty object rather than an error status.
async fn lobby_info(State(state): State<RpcState>, Path(id): Path<String>) -> Response {
    let key = parse_lobby_key(&id);
    match find_lobby(state.lobbies.registry(), &key).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            debug!(error = %e, "lobby lookup failed");
            Json(json!({})).into_response()
        }
    }
}
