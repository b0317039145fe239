use super::{errors_of, BoxError, Error, ValidationHandler};
use crate::error::{DomainError, DomainResult};

/// Collecting handler: every violation is kept, nothing is raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    errors: Vec<Error>,
}

impl Notification {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn with_error(error: Error) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// `Ok` when nothing was recorded, otherwise a validation [`DomainError`].
    pub fn into_result(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::with_errors(self.errors))
        }
    }
}

impl ValidationHandler for Notification {
    fn append(&mut self, error: Error) -> DomainResult<&mut Self> {
        self.errors.push(error);
        Ok(self)
    }

    fn append_all<H: ValidationHandler>(&mut self, other: &H) -> DomainResult<&mut Self> {
        self.errors.extend_from_slice(other.errors());
        Ok(self)
    }

    fn validate<T, E, F>(&mut self, validation: F) -> DomainResult<Option<T>>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        match validation() {
            Ok(value) => Ok(Some(value)),
            Err(failure) => {
                self.errors.extend(errors_of(failure.into()));
                Ok(None)
            }
        }
    }

    fn errors(&self) -> &[Error] {
        &self.errors
    }
}

impl From<DomainError> for Notification {
    fn from(error: DomainError) -> Self {
        Self {
            errors: error.errors(),
        }
    }
}
