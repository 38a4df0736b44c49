//! Mutation type
//!
//! Required arguments are declared non-null, so the executor rejects a
//! document that omits them during validation, before any resolver runs.

use super::schema::{UserObject, backend, field_error};
use crate::core::{NewUser, UserPatch};
use async_graphql::{Context, MaybeUndefined, Object, Result};

/// Entry points for writes
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// Create a user
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        first_name: String,
        age: i32,
        company_id: Option<String>,
    ) -> Result<Option<UserObject>> {
        // The create body is firstName and age only
        if let Some(company_id) = company_id {
            tracing::debug!(%company_id, "addUser: companyId is not sent to the backend");
        }

        let created = backend(ctx)?
            .create_user(NewUser { first_name, age })
            .await
            .map_err(field_error)?;

        Ok(Some(UserObject(created)))
    }

    /// Delete a user, returning the record the backend echoes back
    async fn delete_user(&self, ctx: &Context<'_>, id: String) -> Result<Option<UserObject>> {
        let deleted = backend(ctx)?.delete_user(&id).await.map_err(field_error)?;

        Ok(deleted.map(UserObject))
    }

    /// Update the supplied fields of a user
    ///
    /// The request body repeats `id` next to the changed fields. An argument
    /// passed as `null` is forwarded as `null`, clearing it on the backend.
    async fn edit_user(
        &self,
        ctx: &Context<'_>,
        id: String,
        first_name: MaybeUndefined<String>,
        age: MaybeUndefined<i32>,
        company_id: MaybeUndefined<String>,
    ) -> Result<Option<UserObject>> {
        let patch = UserPatch {
            id: id.clone(),
            first_name,
            age,
            company_id,
        };

        let updated = backend(ctx)?
            .update_user(&id, patch)
            .await
            .map_err(field_error)?;

        Ok(Some(UserObject(updated)))
    }
}
