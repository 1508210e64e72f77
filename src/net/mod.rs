//! # Network Fetch
//!
//! The outbound HTTP collaborator used by the probe and the configuration
//! store. Callers depend on [`HttpClient`]; [`ReqwestClient`] is the
//! production implementation.

pub mod client;
pub mod errors;

pub use client::{FetchRequest, FetchResponse, HttpClient, Method, ReqwestClient};
pub use errors::{FetchError, FetchResult};
