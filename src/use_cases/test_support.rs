use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{Command, LobbyInfo, Response, Transport, TransportError};

pub(crate) fn lobby_info(name: &str) -> LobbyInfo {
    LobbyInfo {
        public_ip_address: "127.0.0.1".to_string(),
        port: 7777,
        max_seats: 8,
        players_count: 1,
        lobby_name: name.to_string(),
    }
}

// In-memory transport driven by the test through a `PeerHandle`.
pub(crate) struct ChannelTransport {
    commands: mpsc::UnboundedReceiver<Result<Command, TransportError>>,
    responses: mpsc::UnboundedSender<Response>,
    closes: Arc<AtomicUsize>,
    peer: String,
}

// Test-side end of a `ChannelTransport`. Dropping `commands` reads as EOF.
pub(crate) struct PeerHandle {
    pub commands: mpsc::UnboundedSender<Result<Command, TransportError>>,
    pub responses: mpsc::UnboundedReceiver<Response>,
    closes: Arc<AtomicUsize>,
}

impl PeerHandle {
    pub(crate) fn send(&self, command: Command) {
        self.commands
            .send(Ok(command))
            .expect("session should still be receiving");
    }

    pub(crate) fn fail(&self, error: TransportError) {
        self.commands
            .send(Err(error))
            .expect("session should still be receiving");
    }

    pub(crate) async fn next_response(&mut self) -> Response {
        tokio::time::timeout(std::time::Duration::from_secs(2), self.responses.recv())
            .await
            .expect("timed out waiting for response")
            .expect("session dropped its response channel")
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub(crate) fn channel_transport(peer: &str) -> (ChannelTransport, PeerHandle) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::unbounded_channel();
    let closes = Arc::new(AtomicUsize::new(0));

    let transport = ChannelTransport {
        commands: command_rx,
        responses: response_tx,
        closes: closes.clone(),
        peer: peer.to_string(),
    };
    let handle = PeerHandle {
        commands: command_tx,
        responses: response_rx,
        closes,
    };
    (transport, handle)
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn receive_command(&mut self) -> Result<Command, TransportError> {
        self.commands.recv().await.unwrap_or(Err(TransportError::Closed))
    }

    async fn send_response(&mut self, response: &Response) -> Result<(), TransportError> {
        self.responses
            .send(response.clone())
            .map_err(|_| TransportError::Closed)
    }

    fn peer_identity(&self) -> &str {
        &self.peer
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
