use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

// Runtime/server constants. Every value can be overridden from the environment.

pub const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PUBLISHER_PORT: u16 = 47920;
pub const DEFAULT_SUBSCRIBER_PORT: u16 = 47921;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const MAX_MESSAGE_SIZE: usize = 8 * 1024;

/// Which transport carries publisher and subscriber traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Persistent TCP connections; a publisher's lobby lives as long as its connection.
    Stream,
    /// JSON over HTTP; lobbies are kept alive by heartbeat posts.
    Rpc,
}

impl FromStr for TransportKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stream" | "tcp" => Ok(Self::Stream),
            "rpc" | "http" => Ok(Self::Rpc),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_address: IpAddr,
    pub publisher_port: u16,
    pub subscriber_port: u16,
    pub transport: TransportKind,
    pub sweep_interval: Duration,
    pub max_message_size: usize,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: bind_address(),
            publisher_port: publisher_port(),
            subscriber_port: subscriber_port(),
            transport: transport(),
            sweep_interval: sweep_interval(),
            max_message_size: max_message_size(),
        }
    }

    pub fn publisher_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.publisher_port)
    }

    pub fn subscriber_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.subscriber_port)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            publisher_port: DEFAULT_PUBLISHER_PORT,
            subscriber_port: DEFAULT_SUBSCRIBER_PORT,
            transport: TransportKind::Stream,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

pub fn bind_address() -> IpAddr {
    parse_or(env::var("RELAY_BIND_ADDRESS").ok(), DEFAULT_BIND_ADDRESS)
}

pub fn publisher_port() -> u16 {
    parse_or(env::var("RELAY_PUBLISHER_PORT").ok(), DEFAULT_PUBLISHER_PORT)
}

pub fn subscriber_port() -> u16 {
    parse_or(env::var("RELAY_SUBSCRIBER_PORT").ok(), DEFAULT_SUBSCRIBER_PORT)
}

pub fn transport() -> TransportKind {
    parse_or(env::var("RELAY_TRANSPORT").ok(), TransportKind::Stream)
}

pub fn sweep_interval() -> Duration {
    let millis = parse_or(env::var("RELAY_SWEEP_INTERVAL_MS").ok(), 0u64);
    if millis == 0 {
        return DEFAULT_SWEEP_INTERVAL;
    }
    Duration::from_millis(millis)
}

pub fn max_message_size() -> usize {
    match parse_or(env::var("RELAY_MAX_MESSAGE_BYTES").ok(), MAX_MESSAGE_SIZE) {
        0 => MAX_MESSAGE_SIZE,
        bytes => bytes,
    }
}

// Unset or unparseable values fall back to the default.
fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
