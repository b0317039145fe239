//! Validation accumulation.
//!
//! A [`ValidationHandler`] decides what happens to a violation: the
//! [`Notification`] collects every error so a caller can report them all at
//! once, while the [`FailFastHandler`] refuses the first one by returning it
//! as `Err`. Validators are written once against the trait and propagate with
//! `?`, so the same checks serve both strategies.

pub mod constraints;
mod fail_fast;
mod notification;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

pub use fail_fast::FailFastHandler;
pub use notification::Notification;

/// Boxed failure raised by an arbitrary validation closure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single violation message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Error {
    message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Strategy receiving violations found by validators.
pub trait ValidationHandler {
    /// Record one error.
    fn append(&mut self, error: Error) -> DomainResult<&mut Self>;

    /// Merge every error recorded by `other`.
    fn append_all<H: ValidationHandler>(&mut self, other: &H) -> DomainResult<&mut Self>;

    /// Run one check, capturing its failure into this handler.
    ///
    /// A [`DomainError`] contributes its structured errors; any other failure
    /// becomes a single error carrying its message. Returns the check's value
    /// when it succeeded.
    fn validate<T, E, F>(&mut self, validation: F) -> DomainResult<Option<T>>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>;

    /// Recorded errors, in the order they were appended.
    fn errors(&self) -> &[Error];

    fn has_error(&self) -> bool {
        !self.errors().is_empty()
    }

    fn first_error(&self) -> Option<&Error> {
        self.errors().first()
    }

    /// Append `violation` if a constraint produced one.
    fn check(&mut self, violation: Option<Error>) -> DomainResult<&mut Self> {
        match violation {
            Some(error) => self.append(error),
            None => Ok(self),
        }
    }
}

/// Constraint checks of one aggregate, bound to a target and a handler.
pub trait Validator {
    fn validate(&mut self) -> DomainResult<()>;
}

/// Flatten an arbitrary failure into structured errors.
pub(crate) fn errors_of(failure: BoxError) -> Vec<Error> {
    match failure.downcast::<DomainError>() {
        Ok(domain) => domain.errors(),
        Err(other) => vec![Error::new(other.to_string())],
    }
}
