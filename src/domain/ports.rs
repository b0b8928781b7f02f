use async_trait::async_trait;

use crate::domain::command::{Command, Response};
use crate::domain::errors::TransportError;

// Port for a single peer connection used by the session use cases.
#[async_trait]
pub trait Transport: Send {
    async fn receive_command(&mut self) -> Result<Command, TransportError>;
    async fn send_response(&mut self, response: &Response) -> Result<(), TransportError>;
    fn peer_identity(&self) -> &str;
    // Best-effort shutdown of the underlying connection.
    async fn close(&mut self);
}
