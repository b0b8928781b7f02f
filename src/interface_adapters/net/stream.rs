// Raw TCP transport: one command per read burst, one write per response.

use crate::domain::{Command, Response, Transport, TransportError};
use crate::interface_adapters::protocol::{decode, encode_response};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const READ_CHUNK: usize = 4096;

pub struct StreamTransport {
    stream: TcpStream,
    peer: String,
    max_message_size: usize,
}

impl StreamTransport {
    pub fn new(stream: TcpStream, peer: SocketAddr, max_message_size: usize) -> Self {
        Self {
            stream,
            peer: peer.to_string(),
            max_message_size,
        }
    }

    // Waits for the first bytes, then drains whatever is already buffered.
    async fn read_burst(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut chunk = [0u8; READ_CHUNK];
        let read = self.stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(TransportError::Closed);
        }

        let mut message = chunk[..read].to_vec();
        loop {
            if message.len() > self.max_message_size {
                return Err(TransportError::Oversized {
                    limit: self.max_message_size,
                });
            }
            match self.stream.try_read(&mut chunk) {
                // EOF right after data: deliver this burst, the next read reports it.
                Ok(0) => break,
                Ok(read) => message.extend_from_slice(&chunk[..read]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(message)
    }
}

#[async_trait]
impl Transport for StreamTransport {
    async fn receive_command(&mut self) -> Result<Command, TransportError> {
        let message = self.read_burst().await?;
        debug!(peer = %self.peer, bytes = message.len(), "message received");
        Ok(decode(&message))
    }

    async fn send_response(&mut self, response: &Response) -> Result<(), TransportError> {
        let bytes = encode_response(response);
        self.stream.write_all(&bytes).await?;
        Ok(())
    }

    fn peer_identity(&self) -> &str {
        &self.peer
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, error = %e, "shutdown after close failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LobbyKey, LookupError};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use uuid::Uuid;

    async fn connected_pair(max_message_size: usize) -> (StreamTransport, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("expected listener to bind");
        let address = listener.local_addr().expect("expected local address");
        let client = TcpStream::connect(address)
            .await
            .expect("expected client to connect");
        let (server, peer) = listener.accept().await.expect("expected accept");
        (StreamTransport::new(server, peer, max_message_size), client)
    }

    #[tokio::test]
    async fn when_peer_writes_a_command_then_it_is_decoded() {
        let (mut transport, mut client) = connected_pair(8192).await;
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"Type":"GetLobbyInfo","Content":"{id}"}}"#);

        client
            .write_all(raw.as_bytes())
            .await
            .expect("expected write");

        let command = transport.receive_command().await.expect("expected command");
        assert_eq!(command, Command::GetLobbyInfo(LobbyKey::Id(id)));
    }

    #[tokio::test]
    async fn when_peer_sends_garbage_then_command_is_unknown() {
        let (mut transport, mut client) = connected_pair(8192).await;

        client.write_all(b"hello?").await.expect("expected write");

        let command = transport.receive_command().await.expect("expected command");
        assert_eq!(command, Command::Unknown);
    }

    #[tokio::test]
    async fn when_peer_disconnects_then_receive_reports_closed() {
        let (mut transport, client) = connected_pair(8192).await;
        drop(client);

        let result = transport.receive_command().await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn when_burst_exceeds_limit_then_receive_reports_oversized() {
        let (mut transport, mut client) = connected_pair(64).await;

        client
            .write_all(&[b'x'; 256])
            .await
            .expect("expected write");
        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = transport.receive_command().await;
        assert!(matches!(result, Err(TransportError::Oversized { limit: 64 })));
    }

    #[tokio::test]
    async fn when_response_is_sent_then_peer_reads_its_wire_form() {
        let (mut transport, mut client) = connected_pair(8192).await;
        let missing = Uuid::new_v4();

        transport
            .send_response(&Response::LookupFailed(LookupError::NotFound(missing)))
            .await
            .expect("expected send");

        let mut buf = [0u8; 256];
        let read = client.read(&mut buf).await.expect("expected read");
        assert_eq!(
            std::str::from_utf8(&buf[..read]).expect("expected utf8"),
            format!("Can't find lobby with id: {missing}.")
        );
    }

    #[tokio::test]
    async fn when_transport_closes_then_peer_sees_eof() {
        let (mut transport, mut client) = connected_pair(8192).await;

        transport.close().await;

        let mut buf = [0u8; 16];
        let read = client.read(&mut buf).await.expect("expected read");
        assert_eq!(read, 0);
        assert!(transport.peer_identity().starts_with("127.0.0.1:"));
    }
}
