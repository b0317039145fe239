use super::{errors_of, BoxError, Error, ValidationHandler};
use crate::error::{DomainError, DomainResult};

/// Refusing handler: the first violation is returned as `Err`.
///
/// Nothing is ever stored, so [`ValidationHandler::errors`] is always empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailFastHandler;

impl ValidationHandler for FailFastHandler {
    fn append(&mut self, error: Error) -> DomainResult<&mut Self> {
        Err(DomainError::with_error(error))
    }

    fn append_all<H: ValidationHandler>(&mut self, other: &H) -> DomainResult<&mut Self> {
        if other.has_error() {
            return Err(DomainError::with_errors(other.errors().to_vec()));
        }
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
                let failure = failure.into();
                match failure.downcast::<DomainError>() {
                    Ok(domain) => Err(*domain),
                    Err(other) => Err(DomainError::with_errors(errors_of(other))),
                }
            }
        }
    }

    fn errors(&self) -> &[Error] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotFound;
    use crate::validation::Notification;

    #[test]
    fn test_append_raises_immediately() {
        let mut handler = FailFastHandler;
        let error = handler
            .append(Error::new("'token' should not be null or blank"))
            .unwrap_err();

        assert_eq!(
            error.errors(),
            vec![Error::new("'token' should not be null or blank")]
        );
        assert!(handler.errors().is_empty());
        assert!(!handler.has_error());
    }

    #[test]
    fn test_append_all_raises_with_every_error() {
        let mut collected = Notification::create();
        collected.append(Error::new("a")).unwrap();
        collected.append(Error::new("b")).unwrap();

        let error = FailFastHandler.append_all(&collected).unwrap_err();
        assert_eq!(error.errors().len(), 2);
    }

    #[test]
    fn test_append_all_of_empty_handler_is_ok() {
        assert!(FailFastHandler.append_all(&Notification::create()).is_ok());
    }

    #[test]
    fn test_validate_propagates_domain_failure_unchanged() {
        let error = FailFastHandler
            .validate(|| -> Result<(), DomainError> {
                Err(NotFound::with_key("Account", "id", "42").into())
            })
            .unwrap_err();

        assert!(error.is_not_found());
    }

    #[test]
    fn test_validate_wraps_unexpected_failure() {
        let error = FailFastHandler
            .validate(|| "-1".parse::<u8>())
            .unwrap_err();

        assert_eq!(error.errors(), vec![Error::new("invalid digit found in string")]);
    }
}
