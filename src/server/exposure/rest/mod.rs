//! Plain HTTP routes served next to the graph endpoint

use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// REST exposure: health checks and caller-supplied routes
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// `custom_routes` are merged after the health routes.
    pub fn build_router(custom_routes: Vec<Router>) -> Result<Router> {
        let mut app = Self::health_routes();

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME")
        }))
    }
}
