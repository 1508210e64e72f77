//! domain-switcher - keeps clients on a reachable domain
//!
//! A failover engine that probes candidate domains in order and tells
//! connected sessions where to go, fed by a candidate list that is fetched
//! fresh when the network allows and read from a durable cache when not.

pub mod blob_store;
pub mod cli;
pub mod failover;
pub mod http_server;
pub mod net;
pub mod observability;
