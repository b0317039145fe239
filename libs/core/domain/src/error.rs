use thiserror::Error;

use crate::identifier::Identifier;
use crate::validation::Error;

/// Raised domain failure carrying structured errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Constraint or business-rule violations (never empty).
    #[error("{}", join_messages(.errors))]
    Validation { errors: Vec<Error> },

    /// The addressed aggregate does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFound),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn with_error(error: Error) -> Self {
        DomainError::Validation {
            errors: vec![error],
        }
    }

    /// Build a validation failure from a non-empty list.
    pub fn with_errors(errors: Vec<Error>) -> Self {
        debug_assert!(!errors.is_empty(), "a domain error must carry errors");
        DomainError::Validation { errors }
    }

    /// Structured errors; a not-found yields its single descriptive message.
    pub fn errors(&self) -> Vec<Error> {
        match self {
            DomainError::Validation { errors } => errors.clone(),
            DomainError::NotFound(not_found) => vec![Error::new(not_found.to_string())],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}

impl From<Error> for DomainError {
    fn from(error: Error) -> Self {
        DomainError::with_error(error)
    }
}

fn join_messages(errors: &[Error]) -> String {
    errors
        .iter()
        .map(Error::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// An aggregate of `kind` addressed by `field = key` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} with {field} {key} was not found")]
pub struct NotFound {
    kind: &'static str,
    field: &'static str,
    key: String,
}

impl NotFound {
    /// Lookup by identifier.
    pub fn with_id<I: Identifier>(kind: &'static str, id: &I) -> Self {
        Self::with_key(kind, "id", id.value())
    }

    /// Lookup by another unique key (email, token, ...).
    pub fn with_key(kind: &'static str, field: &'static str, key: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            key: key.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
