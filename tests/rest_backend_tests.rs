//! REST backend tests against a fake json-server
//!
//! The fake server answers from a route table and records each request's
//! method, path and JSON body, so the tests can assert on the exact wire
//! traffic the gateway produces.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use gateway::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: String,
    path: String,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct FakeServer {
    routes: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeServer {
    fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.into()));
    }

    fn respond_json(&self, method: &str, path: &str, body: Value) {
        self.respond(method, path, 200, body.to_string());
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port, returning the base URL
    async fn start(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

async fn handle(State(fake): State<FakeServer>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    fake.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        body,
    });

    let route = fake
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();

    match route {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            [("content-type", "application/json")],
            body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "{}").into_response(),
    }
}

async fn backend_for(fake: &FakeServer) -> RestBackend {
    RestBackend::new(&fake.start().await).unwrap()
}

fn recorded(method: &str, path: &str, body: Option<Value>) -> Recorded {
    Recorded {
        method: method.to_string(),
        path: path.to_string(),
        body,
    }
}

// =============================================================================
// Read Tests
// =============================================================================

mod read_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_user_decodes_document() {
        let fake = FakeServer::default();
        fake.respond_json(
            "GET",
            "/users/23",
            json!({ "id": "23", "firstName": "Bill", "age": 20, "companyId": "1" }),
        );
        let backend = backend_for(&fake).await;

        let user = backend.get_user("23").await.unwrap().unwrap();

        assert_eq!(
            user,
            User {
                id: Some("23".to_string()),
                first_name: Some("Bill".to_string()),
                age: Some(20),
                company_id: Some("1".to_string()),
            }
        );
        assert_eq!(fake.requests(), vec![recorded("GET", "/users/23", None)]);
    }

    #[tokio::test]
    async fn test_numeric_ids_become_strings() {
        let fake = FakeServer::default();
        fake.respond_json(
            "GET",
            "/users/5",
            json!({ "id": 5, "firstName": "Ada", "age": 30, "companyId": 2 }),
        );
        let backend = backend_for(&fake).await;

        let user = backend.get_user("5").await.unwrap().unwrap();

        assert_eq!(user.id.as_deref(), Some("5"));
        assert_eq!(user.company_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let fake = FakeServer::default();
        let backend = backend_for(&fake).await;

        assert_eq!(backend.get_user("404").await.unwrap(), None);
        assert_eq!(backend.get_company("404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_users_by_company_path_and_missing_company() {
        let fake = FakeServer::default();
        fake.respond_json(
            "GET",
            "/companies/2/users",
            json!([
                { "id": "40", "firstName": "Alex", "age": 40, "companyId": "2" },
                { "id": "41", "firstName": "Nick", "age": 40, "companyId": "2" }
            ]),
        );
        let backend = backend_for(&fake).await;

        let users = backend.get_users_by_company("2").await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].first_name.as_deref(), Some("Nick"));

        let err = backend.get_users_by_company("9").await.unwrap_err();
        assert_eq!(err, BackendError::not_found("company", "9"));
    }

    #[tokio::test]
    async fn test_ids_are_percent_encoded() {
        let fake = FakeServer::default();
        let backend = backend_for(&fake).await;

        let _ = backend.get_user("a/b c").await;

        assert_eq!(fake.requests()[0].path, "/users/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let fake = FakeServer::default();
        fake.respond_json("GET", "/api/companies/1", json!({ "id": "1", "name": "Apple" }));
        let base = fake.start().await;
        let backend = RestBackend::new(&format!("{}/api/", base)).unwrap();

        let company = backend.get_company("1").await.unwrap().unwrap();

        assert_eq!(company.name.as_deref(), Some("Apple"));
        assert_eq!(company.description, None);
    }
}

// =============================================================================
// Write Tests
// =============================================================================

mod write_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_posts_first_name_and_age_only() {
        let fake = FakeServer::default();
        fake.respond(
            "POST",
            "/users",
            201,
            json!({ "id": "77", "firstName": "Ada", "age": 30 }).to_string(),
        );
        let backend = backend_for(&fake).await;

        let created = backend
            .create_user(NewUser {
                first_name: "Ada".to_string(),
                age: 30,
            })
            .await
            .unwrap();

        assert_eq!(created.id.as_deref(), Some("77"));
        assert_eq!(
            fake.requests(),
            vec![recorded(
                "POST",
                "/users",
                Some(json!({ "firstName": "Ada", "age": 30 }))
            )]
        );
    }

    #[tokio::test]
    async fn test_create_on_missing_route_is_status_error() {
        let fake = FakeServer::default();
        let backend = backend_for(&fake).await;

        let err = backend
            .create_user(NewUser {
                first_name: "Ada".to_string(),
                age: 30,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_update_patches_with_id_in_body() {
        let fake = FakeServer::default();
        fake.respond_json(
            "PATCH",
            "/users/7",
            json!({ "id": "7", "firstName": "Bob", "age": 31 }),
        );
        let backend = backend_for(&fake).await;

        let updated = backend
            .update_user(
                "7",
                UserPatch {
                    age: MaybeUndefined::Value(31),
                    ..UserPatch::new("7")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.age, Some(31));
        assert_eq!(
            fake.requests(),
            vec![recorded(
                "PATCH",
                "/users/7",
                Some(json!({ "id": "7", "age": 31 }))
            )]
        );
    }

    #[tokio::test]
    async fn test_update_sends_null_for_cleared_fields() {
        let fake = FakeServer::default();
        fake.respond_json("PATCH", "/users/7", json!({ "id": "7", "age": 31 }));
        let backend = backend_for(&fake).await;

        let updated = backend
            .update_user(
                "7",
                UserPatch {
                    first_name: MaybeUndefined::Null,
                    company_id: MaybeUndefined::Null,
                    ..UserPatch::new("7")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.company_id, None);
        assert_eq!(
            fake.requests()[0].body,
            Some(json!({ "id": "7", "firstName": null, "companyId": null }))
        );
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let fake = FakeServer::default();
        let backend = backend_for(&fake).await;

        let err = backend
            .update_user("8", UserPatch::new("8"))
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::not_found("user", "8"));
    }

    #[tokio::test]
    async fn test_delete_with_empty_object_is_none() {
        let fake = FakeServer::default();
        fake.respond_json("DELETE", "/users/42", json!({}));
        let backend = backend_for(&fake).await;

        assert_eq!(backend.delete_user("42").await.unwrap(), None);
        assert_eq!(fake.requests(), vec![recorded("DELETE", "/users/42", None)]);
    }

    #[tokio::test]
    async fn test_delete_echoing_record_is_some() {
        let fake = FakeServer::default();
        fake.respond_json(
            "DELETE",
            "/users/42",
            json!({ "id": "42", "firstName": "Gone", "age": 1 }),
        );
        let backend = backend_for(&fake).await;

        let deleted = backend.delete_user("42").await.unwrap().unwrap();
        assert_eq!(deleted.first_name.as_deref(), Some("Gone"));
    }

    #[tokio::test]
    async fn test_delete_with_empty_body_is_none() {
        let fake = FakeServer::default();
        fake.respond("DELETE", "/users/42", 200, "");
        let backend = backend_for(&fake).await;

        assert_eq!(backend.delete_user("42").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let fake = FakeServer::default();
        let backend = backend_for(&fake).await;

        let err = backend.delete_user("42").await.unwrap_err();
        assert_eq!(err, BackendError::not_found("user", "42"));
    }
}

// =============================================================================
// Failure Tests
// =============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_error_is_status_error_with_body() {
        let fake = FakeServer::default();
        fake.respond("GET", "/users/1", 500, "database down");
        let backend = backend_for(&fake).await;

        let err = backend.get_user("1").await.unwrap_err();

        match err {
            BackendError::Status {
                method,
                status,
                body,
                url,
            } => {
                assert_eq!(method, "GET");
                assert_eq!(status, 500);
                assert_eq!(body, "database down");
                assert!(url.ends_with("/users/1"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let fake = FakeServer::default();
        fake.respond("GET", "/companies/1", 200, "<html>not json</html>");
        let backend = backend_for(&fake).await;

        let err = backend.get_company("1").await.unwrap_err();

        assert!(matches!(err, BackendError::MalformedResponse { .. }));
        assert_eq!(err.error_code(), "BACKEND_MALFORMED_RESPONSE");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_malformed() {
        let fake = FakeServer::default();
        fake.respond_json("GET", "/companies/1/users", json!({ "users": [] }));
        let backend = backend_for(&fake).await;

        let err = backend.get_users_by_company("1").await.unwrap_err();
        assert!(matches!(err, BackendError::MalformedResponse { .. }));
    }
}

// =============================================================================
// Schema over REST Tests
// =============================================================================

mod schema_tests {
    use super::*;

    async fn schema_for(fake: &FakeServer) -> GatewaySchema {
        build_schema(Arc::new(backend_for(fake).await))
    }

    #[tokio::test]
    async fn test_user_company_traversal_hits_backend_in_order() {
        let fake = FakeServer::default();
        fake.respond_json(
            "GET",
            "/users/23",
            json!({ "id": "23", "firstName": "Bill", "age": 20, "companyId": "1" }),
        );
        fake.respond_json(
            "GET",
            "/companies/1",
            json!({ "id": "1", "name": "Apple", "description": "iphone" }),
        );
        let schema = schema_for(&fake).await;

        let response = schema
            .execute(r#"{ user(id: "23") { firstName company { name } } }"#)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "user": { "firstName": "Bill", "company": { "name": "Apple" } } })
        );
        assert_eq!(
            fake.requests(),
            vec![
                recorded("GET", "/users/23", None),
                recorded("GET", "/companies/1", None),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_user_wire_body_omits_company_id() {
        let fake = FakeServer::default();
        fake.respond(
            "POST",
            "/users",
            201,
            json!({ "id": 12, "firstName": "Ada", "age": 30 }).to_string(),
        );
        let schema = schema_for(&fake).await;

        let response = schema
            .execute(r#"mutation { addUser(firstName: "Ada", age: 30, companyId: "5") { id } }"#)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "addUser": { "id": "12" } })
        );
        assert_eq!(
            fake.requests(),
            vec![recorded(
                "POST",
                "/users",
                Some(json!({ "firstName": "Ada", "age": 30 }))
            )]
        );
    }

    #[tokio::test]
    async fn test_edit_user_wire_body_includes_id() {
        let fake = FakeServer::default();
        fake.respond_json(
            "PATCH",
            "/users/7",
            json!({ "id": "7", "firstName": "Bob", "age": 31 }),
        );
        let schema = schema_for(&fake).await;

        let response = schema
            .execute(r#"mutation { editUser(id: "7", age: 31) { age } }"#)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            fake.requests(),
            vec![recorded(
                "PATCH",
                "/users/7",
                Some(json!({ "id": "7", "age": 31 }))
            )]
        );
    }

    #[tokio::test]
    async fn test_edit_user_wire_body_carries_explicit_null() {
        let fake = FakeServer::default();
        fake.respond_json(
            "PATCH",
            "/users/7",
            json!({ "id": "7", "firstName": "Bob", "age": 31, "companyId": null }),
        );
        let schema = schema_for(&fake).await;

        let response = schema
            .execute(r#"mutation { editUser(id: "7", companyId: null) { id company { id } } }"#)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "editUser": { "id": "7", "company": null } })
        );
        assert_eq!(
            fake.requests(),
            vec![recorded(
                "PATCH",
                "/users/7",
                Some(json!({ "id": "7", "companyId": null }))
            )]
        );
    }

    #[tokio::test]
    async fn test_record_without_id_resolves_null_id() {
        let fake = FakeServer::default();
        fake.respond_json("GET", "/companies/1", json!({ "id": null, "name": "Apple" }));
        let schema = schema_for(&fake).await;

        let response = schema
            .execute(r#"{ company(id: "1") { id name users { id } } }"#)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "company": { "id": null, "name": "Apple", "users": null } })
        );
        assert_eq!(fake.requests(), vec![recorded("GET", "/companies/1", None)]);
    }

    #[tokio::test]
    async fn test_delete_user_returning_empty_object_resolves_null() {
        let fake = FakeServer::default();
        fake.respond_json("DELETE", "/users/42", json!({}));
        let schema = schema_for(&fake).await;

        let response = schema
            .execute(r#"mutation { deleteUser(id: "42") { id } }"#)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "deleteUser": null })
        );
        assert_eq!(fake.requests(), vec![recorded("DELETE", "/users/42", None)]);
    }

    #[tokio::test]
    async fn test_backend_500_surfaces_as_status_code_extension() {
        let fake = FakeServer::default();
        fake.respond("GET", "/companies/1", 500, "boom");
        let schema = schema_for(&fake).await;

        let response = schema.execute(r#"{ company(id: "1") { name } }"#).await;

        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "company": null })
        );
        let body = serde_json::to_value(&response.errors).unwrap();
        assert_eq!(body[0]["extensions"]["code"], json!("BACKEND_STATUS_ERROR"));
    }
}
