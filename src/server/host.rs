//! Server host for transport-agnostic API exposure
//!
//! The host bundles everything an exposure needs: the configuration, the
//! backend service and the executable schema built around it. It holds no
//! per-request state.

use crate::config::GatewayConfig;
use crate::core::BackendService;
use crate::server::exposure::graphql::{GatewaySchema, build_schema};
use std::sync::Arc;

/// Host context shared by all exposures
pub struct GatewayHost {
    /// Validated configuration
    pub config: Arc<GatewayConfig>,

    /// Backend data access used by every resolver
    pub backend: Arc<dyn BackendService>,

    /// Executable GraphQL schema
    pub schema: GatewaySchema,
}

impl GatewayHost {
    /// Build the host from its components
    pub fn new(config: GatewayConfig, backend: Arc<dyn BackendService>) -> Self {
        let schema = build_schema(backend.clone());

        Self {
            config: Arc::new(config),
            backend,
            schema,
        }
    }
}
