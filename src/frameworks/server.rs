// Framework bootstrap for the lobby relay runtime.

use crate::domain::Role;
use crate::frameworks::config::{RelayConfig, TransportKind};
use crate::interface_adapters::net::{ConnectionAcceptor, SessionLimits};
use crate::interface_adapters::rpc::{publisher_routes, subscriber_routes};
use crate::interface_adapters::state::RpcState;
use crate::use_cases::{HeartbeatLobbies, LobbyRegistry};

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::net::TcpListener;

pub fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves both roles on the configured transport until Ctrl-C.
pub async fn run(config: RelayConfig) -> Result<()> {
    // One registry shared by every session of both roles.
    let registry = Arc::new(LobbyRegistry::new());
    tracing::info!(transport = ?config.transport, "starting lobby relay");

    match config.transport {
        TransportKind::Stream => run_stream(&config, registry).await,
        TransportKind::Rpc => run_rpc(&config, registry).await,
    }
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = RelayConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    run(config).await
}

async fn run_stream(config: &RelayConfig, registry: Arc<LobbyRegistry>) -> Result<()> {
    let limits = SessionLimits {
        max_message_size: config.max_message_size,
    };
    let publishers =
        bind_acceptor(config.publisher_addr(), Role::Publisher, registry.clone(), limits).await?;
    let subscribers =
        bind_acceptor(config.subscriber_addr(), Role::Subscriber, registry, limits).await?;

    let handles = [publishers.stop_handle(), subscribers.stop_handle()];
    tokio::spawn(async move {
        shutdown_signal().await;
        for handle in &handles {
            handle.stop();
        }
    });

    tokio::try_join!(publishers.run(), subscribers.run()).inspect_err(|e| {
        tracing::error!(error = %e, "acceptor error");
    })?;
    Ok(())
}

async fn run_rpc(config: &RelayConfig, registry: Arc<LobbyRegistry>) -> Result<()> {
    let lobbies = Arc::new(HeartbeatLobbies::new(registry));
    let state = RpcState {
        lobbies: lobbies.clone(),
    };

    let publisher_listener = bind_listener(config.publisher_addr()).await?;
    let subscriber_listener = bind_listener(config.subscriber_addr()).await?;
    tracing::info!(
        publisher = %config.publisher_addr(),
        subscriber = %config.subscriber_addr(),
        "listening"
    );

    let sweeper = lobbies.clone().spawn_sweeper(config.sweep_interval);

    let publishers = axum::serve(
        publisher_listener,
        publisher_routes(state.clone()).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());
    let subscribers = axum::serve(
        subscriber_listener,
        subscriber_routes(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    // Serve both routers and report errors rather than panicking
    let served = tokio::try_join!(publishers.into_future(), subscribers.into_future());

    sweeper.shutdown().await;
    lobbies.clear().await;

    served.map(|_| ()).inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

async fn bind_acceptor(
    address: SocketAddr,
    role: Role,
    registry: Arc<LobbyRegistry>,
    limits: SessionLimits,
) -> Result<ConnectionAcceptor> {
    ConnectionAcceptor::bind(address, role, registry, limits)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, role = role.as_str(), error = %e, "failed to bind");
        })
}

async fn bind_listener(address: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(address).await.inspect_err(|e| {
        tracing::error!(%address, error = %e, "failed to bind");
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the relay runs until killed.
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
