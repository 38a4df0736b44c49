//! GatewayBuilder for fluent API to build the HTTP server

use super::exposure::{GraphQLExposure, RestExposure};
use super::host::GatewayHost;
use crate::backend::RestBackend;
use crate::config::GatewayConfig;
use crate::core::BackendService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the gateway server
///
/// # Example
///
/// ```ignore
/// GatewayBuilder::new()
///     .with_config(GatewayConfig::default().with_env_overrides()?)
///     .serve()
///     .await?;
/// ```
pub struct GatewayBuilder {
    config: Option<GatewayConfig>,
    backend: Option<Arc<dyn BackendService>>,
    custom_routes: Vec<Router>,
}

impl GatewayBuilder {
    /// Create a new GatewayBuilder
    pub fn new() -> Self {
        Self {
            config: None,
            backend: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the configuration (defaults apply when not called)
    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the REST backend built from configuration
    pub fn with_backend(mut self, backend: impl BackendService + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    ///
    /// Validates the configuration and, unless a backend was supplied, creates
    /// a [`RestBackend`] pointing at `backend.base_url`.
    pub fn build_host(self) -> Result<GatewayHost> {
        Ok(self.into_parts()?.0)
    }

    /// Build the final router: GraphQL, health checks and custom routes,
    /// with request tracing and permissive CORS
    pub fn build(self) -> Result<Router> {
        let (host, custom_routes) = self.into_parts()?;
        Self::router_for(Arc::new(host), custom_routes)
    }

    /// Serve on the configured `server.host:server.port` with graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let (host, custom_routes) = self.into_parts()?;
        let listener = TcpListener::bind(host.config.listen_addr()).await?;

        let app = Self::router_for(Arc::new(host), custom_routes)?;
        Self::run(listener, app).await
    }

    /// Serve on an already bound listener with graceful shutdown
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<()> {
        let app = self.build()?;
        Self::run(listener, app).await
    }

    fn into_parts(self) -> Result<(GatewayHost, Vec<Router>)> {
        let config = self.config.unwrap_or_default().validated()?;

        let backend: Arc<dyn BackendService> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(RestBackend::from_config(&config.backend)?),
        };

        Ok((GatewayHost::new(config, backend), self.custom_routes))
    }

    fn router_for(host: Arc<GatewayHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let graphql = GraphQLExposure::build_router(host)?;
        let rest = RestExposure::build_router(custom_routes)?;

        Ok(graphql.merge(rest).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    async fn run(listener: TcpListener, app: Router) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!("Listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
