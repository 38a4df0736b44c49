//! Server module: host, builder and protocol exposures
//!
//! `GatewayBuilder` assembles configuration and a backend service into a
//! `GatewayHost`, then exposes it over HTTP:
//! - the GraphQL endpoint (`/graphql`, `/graphql/schema`)
//! - health checks (`/health`, `/healthz`)

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::GatewayBuilder;
pub use exposure::{GraphQLExposure, RestExposure};
pub use host::GatewayHost;
