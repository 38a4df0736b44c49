//! Root query type

use super::schema::{CompanyObject, UserObject, backend, field_error};
use crate::core::{BackendError, ValidationError};
use async_graphql::{Context, Object, Result};

/// Entry points for reads
pub struct QueryRoot;

#[Object(name = "RootQueryType")]
impl QueryRoot {
    /// Look up a single user
    async fn user(&self, ctx: &Context<'_>, id: Option<String>) -> Result<Option<UserObject>> {
        let id = id.ok_or_else(|| field_error(ValidationError::missing("id")))?;

        match backend(ctx)?.get_user(&id).await.map_err(field_error)? {
            Some(user) => Ok(Some(UserObject(user))),
            None => Err(field_error(BackendError::not_found("user", id))),
        }
    }

    /// Look up a single company
    async fn company(&self, ctx: &Context<'_>, id: Option<String>) -> Result<Option<CompanyObject>> {
        let id = id.ok_or_else(|| field_error(ValidationError::missing("id")))?;

        match backend(ctx)?.get_company(&id).await.map_err(field_error)? {
            Some(company) => Ok(Some(CompanyObject(company))),
            None => Err(field_error(BackendError::not_found("company", id))),
        }
    }
}
