//! Backend data access implementations

pub mod in_memory;
pub mod rest;

pub use in_memory::{BackendCall, InMemoryBackend};
pub use rest::RestBackend;
