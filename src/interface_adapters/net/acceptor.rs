// Accept loop for one role: every connection becomes its own session task.

use super::stream::StreamTransport;
use crate::domain::Role;
use crate::use_cases::{LobbyRegistry, run_session};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{Instrument, info, info_span, warn};

/// Per-connection limits applied to every accepted stream.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_message_size: usize,
}

pub struct ConnectionAcceptor {
    listener: TcpListener,
    role: Role,
    registry: Arc<LobbyRegistry>,
    limits: SessionLimits,
    handle: AcceptorHandle,
}

/// Cloneable control surface for a running acceptor.
#[derive(Debug, Clone)]
pub struct AcceptorHandle {
    stop_tx: Arc<watch::Sender<bool>>,
    active: Arc<AtomicUsize>,
}

impl AcceptorHandle {
    /// Stops accepting. Sessions already running are left alone.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Number of sessions currently alive.
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

// Keeps the active session count accurate even if a session task panics.
struct ActiveSession(Arc<AtomicUsize>);

impl ActiveSession {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self(active.clone())
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl ConnectionAcceptor {
    pub async fn bind(
        address: SocketAddr,
        role: Role,
        registry: Arc<LobbyRegistry>,
        limits: SessionLimits,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        let (stop_tx, _) = watch::channel(false);

        Ok(Self {
            listener,
            role,
            registry,
            limits,
            handle: AcceptorHandle {
                stop_tx: Arc::new(stop_tx),
                active: Arc::new(AtomicUsize::new(0)),
            },
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn stop_handle(&self) -> AcceptorHandle {
        self.handle.clone()
    }

    /// Accepts until stopped. Accept errors are logged and skipped.
    pub async fn run(self) -> io::Result<()> {
        let address = self.listener.local_addr()?;
        let mut stopped = self.handle.stop_tx.subscribe();
        info!(%address, role = self.role.as_str(), "accepting connections");

        loop {
            tokio::select! {
                _ = stopped.wait_for(|stop| *stop) => {
                    info!(%address, role = self.role.as_str(), "acceptor stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer),
                    Err(e) => warn!(%address, error = %e, "accept failed"),
                }
            }
        }
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        let guard = ActiveSession::enter(&self.handle.active);
        let role = self.role;
        let registry = self.registry.clone();
        let transport = StreamTransport::new(stream, peer, self.limits.max_message_size);
        let span = info_span!("session", role = role.as_str(), %peer);

        tokio::spawn(
            async move {
                let _guard = guard;
                run_session(role, transport, registry).await;
            }
            .instrument(span),
        );
    }
}
