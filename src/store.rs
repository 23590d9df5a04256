//! Collection store: the in-memory users, the editing selection and the UI status.
//!
//! The store never talks to the network. Results of remote operations arrive
//! as [`Completion`] values and are applied in the order they are processed,
//! so the last completion for an entity wins.
//!
use tracing::{debug, warn};

use crate::error::{DynError, Operation};
use crate::model::User;

/// Overall status shown by the UI. An error outranks a pending fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// A fetch is still in flight.
    Loading,
    Ready,
    /// A remote operation failed; holds its static message.
    Failed(&'static str),
}

/// Result of one remote request, delivered back to the UI thread.
#[derive(Debug)]
pub enum Completion {
    Loaded(Result<Vec<User>, DynError>),
    Created(Result<User, DynError>),
    Updated {
        id: u64,
        result: Result<User, DynError>,
    },
    Deleted {
        id: u64,
        result: Result<(), DynError>,
    },
}

impl Completion {
    pub fn operation(&self) -> Operation {
        match self {
            Completion::Loaded(_) => Operation::Fetch,
            Completion::Created(_) => Operation::Create,
            Completion::Updated { .. } => Operation::Update,
            Completion::Deleted { .. } => Operation::Delete,
        }
    }
}

#[derive(Debug)]
pub struct UserStore {
    users: Vec<User>,
    editing: Option<User>,
    fetch_pending: bool,
    // a create or update from the form is in flight
    saving: bool,
    // operation whose failure is on display
    failed: Option<Operation>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Empty store waiting for its first fetch.
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            editing: None,
            fetch_pending: true,
            saving: false,
            failed: None,
        }
    }

    /// Store seeded with records, as if a fetch had already succeeded.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            editing: None,
            fetch_pending: false,
            saving: false,
            failed: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn editing(&self) -> Option<&User> {
        self.editing.as_ref()
    }

    pub fn status(&self) -> Status {
        match (self.error(), self.fetch_pending) {
            (Some(msg), _) => Status::Failed(msg),
            (None, true) => Status::Loading,
            (None, false) => Status::Ready,
        }
    }

    /// True while a fetch is in flight, whether or not an error is shown.
    pub fn is_loading(&self) -> bool {
        self.fetch_pending
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&'static str> {
        self.failed.map(Operation::failure_message)
    }

    pub fn find(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == Some(id))
    }

    pub fn begin_create(&mut self) {
        self.editing = Some(User::draft());
    }

    pub fn begin_edit(&mut self, user: User) {
        self.editing = Some(user);
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Mark a create or update as sent; cleared when its completion arrives.
    pub fn begin_save(&mut self) {
        self.saving = true;
    }

    /// A reload shows the loading state again until its completion arrives.
    /// Errors already on display are kept.
    pub fn begin_reload(&mut self) {
        self.fetch_pending = true;
    }

    pub fn dismiss_error(&mut self) {
        self.failed = None;
    }

    /// Apply one completion. Failures leave the collection untouched.
    pub fn apply(&mut self, completion: Completion) {
        let op = completion.operation();
        match completion {
            Completion::Loaded(Ok(users)) => {
                debug!(count = users.len(), "users loaded");
                self.users = users;
                self.fetch_pending = false;
                // only a fetch failure is cleared by a successful fetch
                if self.failed == Some(Operation::Fetch) {
                    self.failed = None;
                }
            }
            Completion::Created(Ok(user)) => {
                debug!(id = ?user.id, "user created");
                self.insert_created(user);
                self.editing = None;
                self.saving = false;
            }
            Completion::Updated { id, result: Ok(user) } => {
                if user.id != Some(id) {
                    warn!(requested = id, returned = ?user.id, "update answered with a different id");
                }
                self.replace_matching(user);
                self.editing = None;
                self.saving = false;
            }
            Completion::Deleted { id, result: Ok(()) } => {
                debug!(id, "user deleted");
                self.users.retain(|u| u.id != Some(id));
            }
            Completion::Loaded(Err(e))
            | Completion::Created(Err(e))
            | Completion::Updated { result: Err(e), .. }
            | Completion::Deleted { result: Err(e), .. } => self.fail(op, &e),
        }
    }

    fn fail(&mut self, op: Operation, err: &DynError) {
        warn!(operation = %op, error = %err, "request failed");
        match op {
            Operation::Fetch => self.fetch_pending = false,
            Operation::Create | Operation::Update => self.saving = false,
            Operation::Delete => {}
        }
        self.failed = Some(op);
    }

    // Ids stay unique: a created record whose id is already present replaces
    // that entry instead of being appended a second time.
    fn insert_created(&mut self, user: User) {
        match user.id {
            Some(id) if self.find(id).is_some() => {
                warn!(id, "server returned an id already in the collection");
                self.replace_matching(user);
            }
            _ => self.users.push(user),
        }
    }

    // Match on the response id, never on position.
    fn replace_matching(&mut self, user: User) {
        for slot in self.users.iter_mut().filter(|u| u.id.is_some() && u.id == user.id) {
            *slot = user.clone();
        }
    }
}
