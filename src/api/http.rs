use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use super::UserApi;
use crate::error::{Context, Result, simple_error};
use crate::model::User;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// REST client for `{base}/users`. Every request carries JSON content headers.
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: Client,
    base: String,
}

impl HttpUserApi {
    pub fn new(base_url: &Url) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .build()
            .with_ctx(|| "build HTTP client".to_string())?;
        Ok(Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn collection_url(&self) -> String {
        format!("{}/users", self.base)
    }

    pub fn item_url(&self, id: u64) -> String {
        format!("{}/users/{id}", self.base)
    }
}

// Any non-2xx status is a failure; callers do not distinguish 4xx from 5xx.
fn ensure_success(method: &str, url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(simple_error(format!("{method} {url} - {status}")))
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>> {
        let url = self.collection_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_ctx(|| format!("GET {url}"))?;
        let users: Vec<User> = ensure_success("GET", &url, response)?
            .json()
            .await
            .with_ctx(|| format!("decode GET {url}"))?;
        debug!(count = users.len(), "fetched users");
        Ok(users)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_user(&self, draft: &User) -> Result<User> {
        let url = self.collection_url();
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .with_ctx(|| format!("POST {url}"))?;
        let created: User = ensure_success("POST", &url, response)?
            .json()
            .await
            .with_ctx(|| format!("decode POST {url}"))?;
        debug!(id = ?created.id, "created user");
        Ok(created)
    }

    #[instrument(skip(self, draft))]
    async fn update_user(&self, id: u64, draft: &User) -> Result<User> {
        let url = self.item_url(id);
        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .await
            .with_ctx(|| format!("PUT {url}"))?;
        let updated: User = ensure_success("PUT", &url, response)?
            .json()
            .await
            .with_ctx(|| format!("decode PUT {url}"))?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: u64) -> Result<()> {
        let url = self.item_url(id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_ctx(|| format!("DELETE {url}"))?;
        ensure_success("DELETE", &url, response)?;
        Ok(())
    }
}
