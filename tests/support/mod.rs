// Shared helpers for driving a relay over real sockets in integration tests.
#![allow(dead_code)]

use lobby_relay::domain::{Command, LobbyInfo, LobbyPayload, Role};
use lobby_relay::interface_adapters::net::{AcceptorHandle, ConnectionAcceptor, SessionLimits};
use lobby_relay::interface_adapters::protocol::encode;
use lobby_relay::use_cases::LobbyRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use uuid::Uuid;

const IO_TIMEOUT: Duration = Duration::from_secs(2);

// Both acceptors of a stream relay, bound to ephemeral ports.
pub struct StreamRelay {
    pub publisher_addr: SocketAddr,
    pub subscriber_addr: SocketAddr,
    pub registry: Arc<LobbyRegistry>,
    pub publishers: AcceptorHandle,
    pub subscribers: AcceptorHandle,
}

impl StreamRelay {
    pub async fn start(max_message_size: usize) -> Self {
        let registry = Arc::new(LobbyRegistry::new());
        let limits = SessionLimits { max_message_size };
        let publishers = bind(Role::Publisher, &registry, limits).await;
        let subscribers = bind(Role::Subscriber, &registry, limits).await;

        let relay = Self {
            publisher_addr: publishers.local_addr().expect("publisher address"),
            subscriber_addr: subscribers.local_addr().expect("subscriber address"),
            registry,
            publishers: publishers.stop_handle(),
            subscribers: subscribers.stop_handle(),
        };

        tokio::spawn(publishers.run());
        tokio::spawn(subscribers.run());
        relay
    }

    pub async fn publisher(&self) -> Peer {
        Peer::connect(self.publisher_addr).await
    }

    pub async fn subscriber(&self) -> Peer {
        Peer::connect(self.subscriber_addr).await
    }
}

async fn bind(
    role: Role,
    registry: &Arc<LobbyRegistry>,
    limits: SessionLimits,
) -> ConnectionAcceptor {
    ConnectionAcceptor::bind(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        role,
        registry.clone(),
        limits,
    )
    .await
    .expect("bind ephemeral test port")
}

// One client connection speaking the raw wire protocol.
pub struct Peer {
    stream: TcpStream,
}

impl Peer {
    pub async fn connect(address: SocketAddr) -> Self {
        let stream = TcpStream::connect(address)
            .await
            .expect("expected relay to accept");
        Self { stream }
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.expect("expected write");
    }

    pub async fn send(&mut self, command: &Command) {
        self.send_raw(&encode(command)).await;
    }

    pub async fn post(&mut self, info: &LobbyInfo) {
        self.send(&Command::PostLobbyInfo(LobbyPayload::Record(info.clone())))
            .await;
    }

    pub async fn read_response(&mut self) -> String {
        let mut buf = vec![0u8; 16 * 1024];
        let read = tokio::time::timeout(IO_TIMEOUT, self.stream.read(&mut buf))
            .await
            .expect("timed out waiting for response")
            .expect("expected read");
        assert!(read > 0, "connection closed while waiting for a response");
        String::from_utf8(buf[..read].to_vec()).expect("expected utf8 response")
    }

    pub async fn request(&mut self, command: &Command) -> String {
        self.send(command).await;
        self.read_response().await
    }

    pub async fn lobby_ids(&mut self) -> Vec<Uuid> {
        let body = self.request(&Command::GetLobbyGuids).await;
        serde_json::from_str(&body).expect("expected lobby id array")
    }

    // Re-queries until the relay lists `expected` lobbies.
    pub async fn wait_for_lobby_count(&mut self, expected: usize) -> Vec<Uuid> {
        let deadline = tokio::time::Instant::now() + IO_TIMEOUT;
        loop {
            let ids = self.lobby_ids().await;
            if ids.len() == expected {
                return ids;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {expected} lobbies, saw {}",
                ids.len()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    // True once the relay has closed this connection.
    pub async fn is_closed_by_relay(&mut self) -> bool {
        let mut buf = [0u8; 64];
        match tokio::time::timeout(IO_TIMEOUT, self.stream.read(&mut buf)).await {
            Ok(Ok(0)) | Ok(Err(_)) => true,
            Ok(Ok(_)) | Err(_) => false,
        }
    }
}

pub fn lobby_info(ip: &str, port: u16, name: &str) -> LobbyInfo {
    LobbyInfo {
        public_ip_address: ip.to_string(),
        port,
        max_seats: 10,
        players_count: 2,
        lobby_name: name.to_string(),
    }
}

pub async fn wait_for_registry_len(registry: &LobbyRegistry, expected: usize) {
    let deadline = tokio::time::Instant::now() + IO_TIMEOUT;
    while registry.len().await != expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected {expected} lobbies, saw {}",
            registry.len().await
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub async fn wait_for_sessions(handle: &AcceptorHandle, expected: usize) {
    let deadline = tokio::time::Instant::now() + IO_TIMEOUT;
    while handle.active_sessions() != expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected {expected} sessions, saw {}",
            handle.active_sessions()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
