//! # This-Gateway
//!
//! A GraphQL gateway in front of a users/companies REST service.
//!
//! ## Features
//!
//! - **Typed Graph**: `User` and `Company` object types, a `RootQueryType` with
//!   `user` / `company`, and a `Mutation` type with `addUser`, `deleteUser`
//!   and `editUser`
//! - **Read-Through Resolvers**: every field resolution is one REST call, with
//!   no caching, batching or retries
//! - **Pluggable Backend**: resolvers depend on the `BackendService` trait; the
//!   REST implementation and an in-memory one ship with the crate
//! - **Field Error Isolation**: a failing backend call nulls its field and shows
//!   up in the `errors` list with a machine-readable `extensions.code`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gateway::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::default().with_env_overrides()?;
//!
//!     GatewayBuilder::new()
//!         .with_config(config)
//!         .serve()
//!         .await
//! }
//! ```

pub mod backend;
pub mod config;
pub mod core;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BackendError, BackendService, Company, ConfigError, GatewayError, GatewayResult, NewUser,
        User, UserPatch, ValidationError,
    };

    // === Backends ===
    pub use crate::backend::{BackendCall, InMemoryBackend, RestBackend};

    // === Config ===
    pub use crate::config::{BackendConfig, GatewayConfig, ServerConfig};

    // === Server ===
    pub use crate::server::exposure::graphql::{GatewaySchema, build_schema};
    pub use crate::server::{GatewayBuilder, GatewayHost, GraphQLExposure, RestExposure};

    // === External dependencies ===
    pub use async_graphql::MaybeUndefined;
    pub use async_trait::async_trait;
}
