//! Error and result types shared across the crate.
//!
//! Library code returns boxed errors annotated with [`Context::with_ctx`].
//! When a request fails, the UI never shows the underlying error. It shows the
//! static message of the [`Operation`] that failed.
//!
use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

/// The four remote operations, each with the message shown when it fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Static user-facing message. Network, 4xx and 5xx failures all look the same.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch users",
            Operation::Create => "Failed to create user",
            Operation::Update => "Failed to update user",
            Operation::Delete => "Failed to delete user",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_source_and_message() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("connection reset"));
        let err = res.with_ctx(|| "GET /users".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "GET /users: connection reset");
        assert!(std::error::Error::source(&*err).is_some());
    }

    #[test]
    fn failure_messages_are_static_per_operation() {
        assert_eq!(Operation::Fetch.failure_message(), "Failed to fetch users");
        assert_eq!(Operation::Create.failure_message(), "Failed to create user");
        assert_eq!(Operation::Update.failure_message(), "Failed to update user");
        assert_eq!(Operation::Delete.failure_message(), "Failed to delete user");
    }
}
