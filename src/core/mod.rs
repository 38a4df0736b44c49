//! Core module containing the entity shapes, error types and the data access trait

pub mod entity;
pub mod error;
pub mod service;

pub use entity::{Company, NewUser, User, UserPatch};
pub use error::{BackendError, ConfigError, GatewayError, GatewayResult, ValidationError};
pub use service::BackendService;
