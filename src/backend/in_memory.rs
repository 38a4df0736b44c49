//! In-memory implementation of BackendService for testing and development
//!
//! Behaves like a small json-server: users and companies live in maps, and new
//! users get sequential ids. Every call is recorded so tests can assert which
//! backend requests a GraphQL operation produced, and in what order.

use crate::core::{BackendError, BackendService, Company, NewUser, User, UserPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// One recorded backend request
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    GetUser(String),
    GetCompany(String),
    GetUsersByCompany(String),
    CreateUser(NewUser),
    DeleteUser(String),
    UpdateUser { id: String, patch: UserPatch },
}

/// In-memory backend service
///
/// Clones share the same data and call log.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    users: Arc<RwLock<HashMap<String, User>>>,
    companies: Arc<RwLock<HashMap<String, Company>>>,
    calls: Arc<RwLock<Vec<BackendCall>>>,
    failure: Arc<RwLock<Option<BackendError>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user under its id (records without one are stored under `""`)
    pub fn insert_user(&self, user: User) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.id.clone().unwrap_or_default(), user);
    }

    pub fn insert_company(&self, company: Company) {
        self.companies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(company.id.clone().unwrap_or_default(), company);
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_calls(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Make every subsequent call fail with `error` (or succeed again with `None`)
    ///
    /// Failing calls are still recorded.
    pub fn set_failure(&self, error: Option<BackendError>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    fn record(&self, call: BackendCall) -> Result<(), BackendError> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        match self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BackendService for InMemoryBackend {
    async fn get_user(&self, id: &str) -> Result<Option<User>, BackendError> {
        self.record(BackendCall::GetUser(id.to_string()))?;

        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(id).cloned())
    }

    async fn get_company(&self, id: &str) -> Result<Option<Company>, BackendError> {
        self.record(BackendCall::GetCompany(id.to_string()))?;

        let companies = self.companies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(companies.get(id).cloned())
    }

    async fn get_users_by_company(&self, company_id: &str) -> Result<Vec<User>, BackendError> {
        self.record(BackendCall::GetUsersByCompany(company_id.to_string()))?;

        let companies = self.companies.read().unwrap_or_else(PoisonError::into_inner);
        if !companies.contains_key(company_id) {
            return Err(BackendError::not_found("company", company_id));
        }

        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        let mut members: Vec<User> = users
            .values()
            .filter(|user| user.company_id.as_deref() == Some(company_id))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(members)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, BackendError> {
        self.record(BackendCall::CreateUser(user.clone()))?;

        let id = format!("gen-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let created = User {
            id: Some(id.clone()),
            first_name: Some(user.first_name),
            age: Some(user.age),
            company_id: None,
        };

        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, created.clone());

        Ok(created)
    }

    async fn delete_user(&self, id: &str) -> Result<Option<User>, BackendError> {
        self.record(BackendCall::DeleteUser(id.to_string()))?;

        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(Some)
            .ok_or_else(|| BackendError::not_found("user", id))
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, BackendError> {
        self.record(BackendCall::UpdateUser {
            id: id.to_string(),
            patch: patch.clone(),
        })?;

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .get_mut(id)
            .ok_or_else(|| BackendError::not_found("user", id))?;

        // The record stays under its key; `patch.id` is wire payload only
        patch.apply_to(user);

        Ok(user.clone())
    }
}
