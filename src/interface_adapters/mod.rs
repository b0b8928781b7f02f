// Interface adapters: wire protocol, stream and RPC transports.

pub mod http;
pub mod net;
pub mod protocol;
pub mod rpc;
pub mod state;
