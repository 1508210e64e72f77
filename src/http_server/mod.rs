//! # Session Server
//!
//! HTTP surface of the failover engine.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/ws` - Session WebSocket (`CHECK_DOMAIN`, `REFRESH_CONFIG`)
//! - `/domains.json` - Candidate list, network-first with cache fallback
//! - `/observability/metrics` - Counters

pub mod config;
pub mod config_routes;
pub mod observability_routes;
pub mod server;
pub mod session_routes;

pub use config::HttpServerConfig;
pub use config_routes::{CONFIG_SOURCE_HEADER, DOMAINS_PATH};
pub use server::{AppState, HttpServer};
