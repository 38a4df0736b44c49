//! REST implementation of BackendService
//!
//! One method call is one HTTP request. There is no retry and no response
//! caching; connection reuse is whatever `reqwest::Client` does by default.

use crate::config::BackendConfig;
use crate::core::{BackendError, BackendService, Company, ConfigError, NewUser, User, UserPatch};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Backend service talking to a json-server style REST API
#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base_url: Url,
}

impl RestBackend {
    /// Create a backend for `base_url` with a default client
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a backend from configuration, applying the request timeout
    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Self::with_client(client, &config.base_url)
    }

    /// Create a backend reusing an existing client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::Invalid {
            message: format!("invalid backend URL '{}': {}", base_url, e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                message: format!("backend URL '{}' cannot carry a path", base_url),
            });
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base_url}/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send one request
    ///
    /// Returns `Ok(None)` on 404 and the raw body on any 2xx status.
    async fn send<B>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<Option<Vec<u8>>, BackendError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, %url, "backend request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport_error = |e: reqwest::Error| BackendError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%method, %url, "backend returned 404");
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "backend request failed");
            return Err(BackendError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(Some(bytes.to_vec()))
    }

    async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>, BackendError> {
        match self.send::<()>(Method::GET, url, None).await? {
            Some(bytes) => decode(url, &bytes).map(Some),
            None => Ok(None),
        }
    }
}

fn decode<T: DeserializeOwned>(url: &Url, bytes: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(bytes).map_err(|e| BackendError::MalformedResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// A 404 on a write means the route itself is missing
fn missing_route(method: Method, url: &Url) -> BackendError {
    BackendError::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: StatusCode::NOT_FOUND.as_u16(),
        body: String::new(),
    }
}

#[async_trait]
impl BackendService for RestBackend {
    async fn get_user(&self, id: &str) -> Result<Option<User>, BackendError> {
        self.get(&self.endpoint(&["users", id])).await
    }

    async fn get_company(&self, id: &str) -> Result<Option<Company>, BackendError> {
        self.get(&self.endpoint(&["companies", id])).await
    }

    async fn get_users_by_company(&self, company_id: &str) -> Result<Vec<User>, BackendError> {
        self.get(&self.endpoint(&["companies", company_id, "users"]))
            .await?
            .ok_or_else(|| BackendError::not_found("company", company_id))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, BackendError> {
        let url = self.endpoint(&["users"]);
        match self.send(Method::POST, &url, Some(&user)).await? {
            Some(bytes) => decode(&url, &bytes),
            None => Err(missing_route(Method::POST, &url)),
        }
    }

    async fn delete_user(&self, id: &str) -> Result<Option<User>, BackendError> {
        let url = self.endpoint(&["users", id]);
        let bytes = self
            .send::<()>(Method::DELETE, &url, None)
            .await?
            .ok_or_else(|| BackendError::not_found("user", id))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        // json-server answers a delete with `{}`
        match decode::<serde_json::Value>(&url, &bytes)? {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(map) if map.is_empty() => Ok(None),
            value => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| BackendError::MalformedResponse {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, BackendError> {
        let url = self.endpoint(&["users", id]);
        match self.send(Method::PATCH, &url, Some(&patch)).await? {
            Some(bytes) => decode(&url, &bytes),
            None => Err(BackendError::not_found("user", id)),
        }
    }
}
