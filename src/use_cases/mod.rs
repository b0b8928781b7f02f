// Use cases layer: registry, sessions and eviction workflows.

pub mod heartbeat;
pub mod publisher;
pub mod queries;
pub mod registry;
pub mod session;
pub mod subscriber;

#[cfg(test)]
pub(crate) mod test_support;

pub use heartbeat::{HeartbeatLobbies, SweeperHandle};
pub use publisher::PublisherSession;
pub use registry::LobbyRegistry;
pub use session::{SessionControl, run_session};
pub use subscriber::SubscriberSession;
