//! API Exposure modules
//!
//! Each exposure consumes the `GatewayHost` (or part of it) and produces a
//! Router for its protocol.

pub mod graphql;
pub mod rest;

pub use graphql::GraphQLExposure;
pub use rest::RestExposure;
