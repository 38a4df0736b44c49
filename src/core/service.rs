//! Service trait for backend data access

use crate::core::entity::{Company, NewUser, User, UserPatch};
use crate::core::error::BackendError;
use async_trait::async_trait;

/// Data access seam between the GraphQL resolvers and the REST backend
///
/// Each method maps to exactly one backend request. Implementations must not
/// cache, batch or retry: every call is a fresh read-through or write-through.
/// The schema layer depends only on this trait, so an in-memory implementation
/// can stand in for the real backend.
#[async_trait]
pub trait BackendService: Send + Sync {
    /// Get a user by ID (`GET /users/{id}`)
    ///
    /// Returns `Ok(None)` when the backend reports not-found.
    async fn get_user(&self, id: &str) -> Result<Option<User>, BackendError>;

    /// Get a company by ID (`GET /companies/{id}`)
    ///
    /// Returns `Ok(None)` when the backend reports not-found.
    async fn get_company(&self, id: &str) -> Result<Option<Company>, BackendError>;

    /// List the users belonging to a company (`GET /companies/{id}/users`)
    async fn get_users_by_company(&self, company_id: &str) -> Result<Vec<User>, BackendError>;

    /// Create a user (`POST /users`)
    async fn create_user(&self, user: NewUser) -> Result<User, BackendError>;

    /// Delete a user (`DELETE /users/{id}`)
    ///
    /// Returns the deleted record when the backend echoes it back, `None` when
    /// the response is empty.
    async fn delete_user(&self, id: &str) -> Result<Option<User>, BackendError>;

    /// Partially update a user (`PATCH /users/{id}`)
    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, BackendError>;
}
