//! GraphQL API exposure for the gateway
//!
//! Routes:
//! - `POST /graphql` executes a `{query, variables, operationName}` document
//! - `GET /graphql?query=...` executes a query from the query string; without a
//!   `query` parameter it serves GraphiQL (when enabled)
//! - `GET /graphql/schema` returns the schema as SDL

mod mutation;
mod query;
mod schema;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use schema::{CompanyObject, GatewaySchema, UserObject, build_schema};

use crate::server::host::GatewayHost;
use anyhow::Result;
use async_graphql::http::{GraphiQLSource, parse_query_string};
use async_graphql::parser::types::{DocumentOperations, OperationType};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension, Json, Router,
    extract::RawQuery,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;

/// Path of the graph endpoint
pub const GRAPHQL_PATH: &str = "/graphql";

#[derive(Clone)]
struct GraphQLState {
    schema: GatewaySchema,
    graphiql: bool,
}

/// GraphQL API exposure implementation
pub struct GraphQLExposure;

impl GraphQLExposure {
    /// Build the GraphQL router from a host
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let host = Arc::new(GatewayBuilder::new().build_host()?);
    /// let graphql_app = GraphQLExposure::build_router(host)?;
    /// ```
    pub fn build_router(host: Arc<GatewayHost>) -> Result<Router> {
        let state = GraphQLState {
            schema: host.schema.clone(),
            graphiql: host.config.graphiql,
        };

        let router = Router::new()
            .route(GRAPHQL_PATH, get(graphql_get).post(graphql_post))
            .route("/graphql/schema", get(graphql_schema))
            .layer(Extension(state));

        Ok(router)
    }
}

/// Handler for POST requests
async fn graphql_post(
    Extension(state): Extension<GraphQLState>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

/// Handler for GET requests: query-string execution or GraphiQL
async fn graphql_get(
    Extension(state): Extension<GraphQLState>,
    RawQuery(raw): RawQuery,
) -> Response {
    let raw = raw.unwrap_or_default();

    if !has_query_param(&raw) {
        if state.graphiql {
            return Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish()).into_response();
        }
        return error_envelope(StatusCode::BAD_REQUEST, "Must provide query string.");
    }

    let request = match parse_query_string(&raw) {
        Ok(request) => request,
        Err(e) => return error_envelope(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    if selects_mutation(&request) {
        return error_envelope(
            StatusCode::METHOD_NOT_ALLOWED,
            "Can only perform a mutation operation from a POST request.",
        );
    }

    GraphQLResponse::from(state.schema.execute(request).await).into_response()
}

/// Handler for the SDL export
async fn graphql_schema(Extension(state): Extension<GraphQLState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.schema.sdl(),
    )
}

fn has_query_param(raw: &str) -> bool {
    raw.split('&')
        .any(|pair| pair.split('=').next() == Some("query"))
}

/// Whether the operation the request would run is a mutation
///
/// Unparseable documents return false and are left to the executor to report.
fn selects_mutation(request: &async_graphql::Request) -> bool {
    let Ok(document) = async_graphql::parser::parse_query(&request.query) else {
        return false;
    };

    match &document.operations {
        DocumentOperations::Single(operation) => operation.node.ty == OperationType::Mutation,
        DocumentOperations::Multiple(operations) => match request.operation_name.as_deref() {
            Some(name) => operations
                .get(name)
                .is_some_and(|operation| operation.node.ty == OperationType::Mutation),
            None => false,
        },
    }
}

fn error_envelope(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errors": [{ "message": message }] }))).into_response()
}
