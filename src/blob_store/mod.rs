//! # Durable Blob Store
//!
//! Key → bytes storage for the last-known-good configuration document.
//! Values are always written whole; a read observes either the previous
//! value or the new one, never a mix.

pub mod backend;
pub mod errors;
pub mod local;
pub mod memory;

pub use backend::BlobStore;
pub use errors::{BlobError, BlobResult};
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
