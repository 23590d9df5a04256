//! Fire-and-forget request dispatch.
//!
//! Each call spawns one independent task on the tokio runtime. When the
//! request resolves, its [`Completion`] is sent to the UI thread, which applies
//! it to the [`UserStore`]. Nothing is queued, cancelled or retried.
//!
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::api::UserApi;
use crate::model::User;
use crate::store::{Completion, UserStore};

#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn UserApi>,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end the UI loop drains.
    pub fn new(api: Arc<dyn UserApi>, runtime: Handle) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, runtime, tx }, rx)
    }

    pub fn load(&self) {
        let api = Arc::clone(&self.api);
        self.spawn("load", async move { Completion::Loaded(api.list_users().await) });
    }

    pub fn create(&self, draft: User) {
        let api = Arc::clone(&self.api);
        self.spawn("create", async move {
            Completion::Created(api.create_user(&draft).await)
        });
    }

    pub fn update(&self, id: u64, draft: User) {
        let api = Arc::clone(&self.api);
        self.spawn("update", async move {
            let result = api.update_user(id, &draft).await;
            Completion::Updated { id, result }
        });
    }

    pub fn delete(&self, id: u64) {
        let api = Arc::clone(&self.api);
        self.spawn("delete", async move {
            let result = api.delete_user(id).await;
            Completion::Deleted { id, result }
        });
    }

    fn spawn<F>(&self, what: &'static str, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        debug!(request = what, "dispatching");
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let completion = request.await;
            if tx.send(completion).is_err() {
                trace!(request = what, "UI gone, completion dropped");
            }
        });
    }
}

/// Apply every completion that has already arrived, in arrival order.
/// Returns how many were applied.
pub fn drain(rx: &mut UnboundedReceiver<Completion>, store: &mut UserStore) -> usize {
    let mut applied = 0;
    while let Ok(completion) = rx.try_recv() {
        store.apply(completion);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FakeUserApi;
    use crate::error::Operation;

    fn seeded() -> Arc<FakeUserApi> {
        Arc::new(FakeUserApi::with_users(vec![
            User { id: Some(1), name: "Leanne".into(), ..User::draft() },
            User { id: Some(2), name: "Ervin".into(), ..User::draft() },
        ]))
    }

    #[tokio::test]
    async fn load_then_create_flows_into_store() {
        let api = seeded();
        let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
        let mut store = UserStore::new();

        dispatcher.load();
        store.apply(rx.recv().await.unwrap());
        assert_eq!(store.users().len(), 2);

        store.begin_create();
        dispatcher.create(User { name: "Clementine".into(), ..User::draft() });
        store.apply(rx.recv().await.unwrap());
        assert_eq!(store.users().len(), 3);
        assert_eq!(store.users()[2].id, Some(3));
        assert!(store.editing().is_none());
    }

    #[tokio::test]
    async fn failed_delete_is_reported_with_static_message() {
        let api = seeded();
        api.fail(Operation::Delete).await;
        let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
        let mut store = UserStore::with_users(api.snapshot().await);

        dispatcher.delete(1);
        store.apply(rx.recv().await.unwrap());
        assert_eq!(store.error(), Some("Failed to delete user"));
        assert!(store.find(1).is_some());
    }

    #[tokio::test]
    async fn drain_applies_only_arrived_completions() {
        let api = seeded();
        let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
        let mut store = UserStore::new();
        assert_eq!(drain(&mut rx, &mut store), 0);

        dispatcher.delete(2);
        let completion = rx.recv().await.unwrap();
        store.apply(Completion::Loaded(Ok(api.snapshot().await)));
        store.apply(completion);
        assert_eq!(store.users().len(), 1);
        assert_eq!(drain(&mut rx, &mut store), 0);
    }
}
