use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::UserApi;
use crate::error::{Operation, Result, simple_error};
use crate::model::User;

/// In-memory users resource.
///
/// Ids are assigned from a counter starting after the highest seeded id.
/// Individual operations can be made to fail, and each call can be delayed
/// by popping the next entry of a delay queue, which lets tests force
/// completions to arrive out of order.
pub struct FakeUserApi {
    users: Mutex<Vec<User>>,
    next_id: AtomicU64,
    failing: Mutex<Vec<Operation>>,
    delays: Mutex<VecDeque<Duration>>,
    calls: AtomicU64,
}

impl Default for FakeUserApi {
    fn default() -> Self {
        Self::with_users(Vec::new())
    }
}

impl FakeUserApi {
    pub fn with_users(users: Vec<User>) -> Self {
        let max_id = users.iter().filter_map(|u| u.id).max().unwrap_or(0);
        Self {
            users: Mutex::new(users),
            next_id: AtomicU64::new(max_id + 1),
            failing: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            calls: AtomicU64::new(0),
        }
    }

    pub async fn fail(&self, op: Operation) {
        self.failing.lock().await.push(op);
    }

    pub async fn recover(&self, op: Operation) {
        self.failing.lock().await.retain(|o| *o != op);
    }

    /// Queue a delay for the next call; calls without a queued delay answer immediately.
    pub async fn push_delay(&self, delay: Duration) {
        self.delays.lock().await.push_back(delay);
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.users.lock().await.clone()
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    async fn enter(&self, op: Operation) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let delay = self.delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().await.contains(&op) {
            return Err(simple_error(format!("fake {op} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl UserApi for FakeUserApi {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.enter(Operation::Fetch).await?;
        Ok(self.snapshot().await)
    }

    async fn create_user(&self, draft: &User) -> Result<User> {
        self.enter(Operation::Create).await?;
        let created = User {
            id: Some(self.next_id.fetch_add(1, Ordering::Relaxed)),
            ..draft.clone()
        };
        self.users.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: u64, draft: &User) -> Result<User> {
        self.enter(Operation::Update).await?;
        let updated = User {
            id: Some(id),
            ..draft.clone()
        };
        let mut users = self.users.lock().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == Some(id))
            .ok_or_else(|| simple_error(format!("user {id} not found")))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        self.enter(Operation::Delete).await?;
        self.users.lock().await.retain(|u| u.id != Some(id));
        Ok(())
    }
}
