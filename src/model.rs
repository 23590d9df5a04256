//! User records as exchanged with the REST resource.
//!
use serde::{Deserialize, Deserializer, Serialize};

/// Postal address; only street and city are edited, other wire members are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
}

/// A user record. Drafts have no `id` until the server assigns one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub address: Address,
    #[serde(
        default,
        deserialize_with = "company_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl User {
    /// Empty draft, the selection that means "create new".
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }
}

/// The public resource nests the company as `{ "name": .., "catchPhrase": .. }`,
/// while drafts we send carry a plain string. Accept both.
fn company_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Company {
        Name(String),
        Object {
            #[serde(default)]
            name: Option<String>,
        },
    }

    Ok(match Option::<Company>::deserialize(deserializer)? {
        Some(Company::Name(name)) => Some(name),
        Some(Company::Object { name }) => name,
        None => None,
    })
}
