//! Network boundary for the users resource.
//!
//! [`UserApi`] is implemented by [`HttpUserApi`] for the real REST resource and
//! by [`FakeUserApi`], an in-memory stand-in used by tests.
//!
pub mod fake;
pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::User;

pub use fake::FakeUserApi;
pub use http::HttpUserApi;

#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /users`
    async fn list_users(&self) -> Result<Vec<User>>;

    /// `POST /users`; the server assigns the id.
    async fn create_user(&self, draft: &User) -> Result<User>;

    /// `PUT /users/{id}`
    async fn update_user(&self, id: u64, draft: &User) -> Result<User>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, id: u64) -> Result<()>;
}
