// Network adapters for the raw stream transport.

pub mod acceptor;
pub mod stream;

pub use acceptor::{AcceptorHandle, ConnectionAcceptor, SessionLimits};
pub use stream::StreamTransport;
