//! Entity shapes exchanged with the REST backend
//!
//! The backend is the system of record. These types only describe the JSON
//! documents it sends and accepts; the gateway never keeps them around past a
//! single field resolution.

use async_graphql::MaybeUndefined;
use serde::{Deserialize, Deserializer, Serialize};

/// A user as returned by `GET /users/{id}` and the user write endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub age: Option<i32>,

    /// Foreign key to the owning company, if any
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<String>,
}

/// A company as returned by `GET /companies/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /users`
///
/// Only `firstName` and `age` are transmitted. A company id supplied to the
/// `addUser` mutation is not part of this body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub age: i32,
}

/// Body of `PATCH /users/{id}`
///
/// Carries every argument the client supplied, the identifier included.
/// Arguments left out are omitted from the JSON; arguments given as an
/// explicit `null` are sent as `null` so the backend clears them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub id: String,

    #[serde(skip_serializing_if = "MaybeUndefined::is_undefined")]
    pub first_name: MaybeUndefined<String>,

    #[serde(skip_serializing_if = "MaybeUndefined::is_undefined")]
    pub age: MaybeUndefined<i32>,

    #[serde(skip_serializing_if = "MaybeUndefined::is_undefined")]
    pub company_id: MaybeUndefined<String>,
}

impl UserPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: MaybeUndefined::Undefined,
            age: MaybeUndefined::Undefined,
            company_id: MaybeUndefined::Undefined,
        }
    }

    /// Merge the patch into a stored user
    ///
    /// Undefined fields are kept, null fields are cleared. The user's `id` is
    /// left alone.
    pub fn apply_to(self, user: &mut User) {
        apply(self.first_name, &mut user.first_name);
        apply(self.age, &mut user.age);
        apply(self.company_id, &mut user.company_id);
    }
}

fn apply<T>(field: MaybeUndefined<T>, target: &mut Option<T>) {
    match field {
        MaybeUndefined::Undefined => {}
        MaybeUndefined::Null => *target = None,
        MaybeUndefined::Value(value) => *target = Some(value),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Backends that auto-increment identifiers hand them out as JSON numbers
fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
