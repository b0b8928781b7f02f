// Shared HTTP response types for the RPC routes.

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    // Human-readable reason a request body was rejected.
    pub error: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct DropLobbyResponse {
    pub success: bool,
}
