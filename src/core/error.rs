//! Typed error handling for the gateway
//!
//! Every failure a resolver can hit is one of these variants. Nothing is
//! recovered locally: errors travel up to the GraphQL executor, which nulls the
//! failing field and reports it in the `errors` list of the response.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a required argument was not supplied
//! - [`BackendError`]: the REST backend could not be reached, answered with a
//!   failure status, or sent a body that does not fit the expected shape
//! - [`ConfigError`]: configuration could not be loaded or is invalid
//!
//! # Example
//!
//! ```rust,ignore
//! match backend.get_user("42").await {
//!     Ok(Some(user)) => println!("Found: {:?}", user),
//!     Ok(None) => println!("No such user"),
//!     Err(BackendError::Transport { url, .. }) => eprintln!("{} unreachable", url),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use async_graphql::ErrorExtensions;
use std::fmt;

/// The main error type for the gateway
#[derive(Debug)]
pub enum GatewayError {
    /// Argument validation errors
    Validation(ValidationError),

    /// REST backend errors
    Backend(BackendError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Validation(e) => write!(f, "{}", e),
            GatewayError::Backend(e) => write!(f, "{}", e),
            GatewayError::Config(e) => write!(f, "{}", e),
            GatewayError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Validation(e) => Some(e),
            GatewayError::Backend(e) => Some(e),
            GatewayError::Config(e) => Some(e),
            GatewayError::Internal(_) => None,
        }
    }
}

impl GatewayError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Validation(e) => e.error_code(),
            GatewayError::Backend(e) => e.error_code(),
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// GraphQL field errors carry the error code under `extensions.code`
impl ErrorExtensions for GatewayError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised before any backend call is made
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },
}

impl ValidationError {
    pub fn missing(argument: impl Into<String>) -> Self {
        ValidationError::MissingArgument {
            argument: argument.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingArgument { .. } => "MISSING_ARGUMENT",
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        GatewayError::Validation(err)
    }
}

// =============================================================================
// Backend Errors
// =============================================================================

/// Errors related to calls against the REST backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The backend answered 404
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },

    /// The request never produced a response
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
    },

    /// The backend answered with a non-success status other than 404
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body does not match the expected shape
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
}

impl BackendError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        BackendError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BackendError::NotFound { .. } => "BACKEND_NOT_FOUND",
            BackendError::Transport { .. } => "BACKEND_TRANSPORT_ERROR",
            BackendError::Status { .. } => "BACKEND_STATUS_ERROR",
            BackendError::MalformedResponse { .. } => "BACKEND_MALFORMED_RESPONSE",
        }
    }
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        GatewayError::Backend(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<ConfigError> for GatewayError {
    fn from(err: ConfigError) -> Self {
        GatewayError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::Invalid {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
