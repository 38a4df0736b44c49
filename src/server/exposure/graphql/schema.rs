//! GraphQL object types and schema assembly
//!
//! `User` and `Company` wrap the backend documents. Their relation fields
//! issue one backend read each, using an attribute of the already resolved
//! parent, so a child request always starts after its parent's has finished.

use super::mutation::MutationRoot;
use super::query::QueryRoot;
use crate::core::{BackendService, Company, GatewayError, User};
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema};
use std::sync::Arc;

/// The executable gateway schema
pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema around a backend service
///
/// The service is stored in the schema data; resolvers look it up from the
/// context on every call.
pub fn build_schema(backend: Arc<dyn BackendService>) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(backend)
        .finish()
}

/// Fetch the backend service from the resolver context
pub(crate) fn backend<'a>(ctx: &Context<'a>) -> Result<&'a Arc<dyn BackendService>> {
    ctx.data::<Arc<dyn BackendService>>().map_err(|_| {
        GatewayError::Internal("backend service is not registered in the schema".to_string())
            .extend()
    })
}

/// Convert a gateway failure into a field error carrying its code
pub(crate) fn field_error(err: impl Into<GatewayError>) -> async_graphql::Error {
    err.into().extend()
}

/// GraphQL view of a [`User`]
pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> Option<&str> {
        self.0.id.as_deref()
    }

    async fn first_name(&self) -> Option<&str> {
        self.0.first_name.as_deref()
    }

    async fn age(&self) -> Option<i32> {
        self.0.age
    }

    /// The company this user belongs to
    ///
    /// Null when the user has no company or the backend does not know it.
    async fn company(&self, ctx: &Context<'_>) -> Result<Option<CompanyObject>> {
        let Some(company_id) = self.0.company_id.as_deref() else {
            return Ok(None);
        };

        let company = backend(ctx)?
            .get_company(company_id)
            .await
            .map_err(field_error)?;

        Ok(company.map(CompanyObject))
    }
}

/// GraphQL view of a [`Company`]
pub struct CompanyObject(pub Company);

#[Object(name = "Company")]
impl CompanyObject {
    async fn id(&self) -> Option<&str> {
        self.0.id.as_deref()
    }

    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Users working at this company
    ///
    /// Null without a backend call when the company record has no id.
    async fn users(&self, ctx: &Context<'_>) -> Result<Option<Vec<Option<UserObject>>>> {
        let Some(company_id) = self.0.id.as_deref() else {
            return Ok(None);
        };

        let users = backend(ctx)?
            .get_users_by_company(company_id)
            .await
            .map_err(field_error)?;

        Ok(Some(users.into_iter().map(|user| Some(UserObject(user))).collect()))
    }
}
