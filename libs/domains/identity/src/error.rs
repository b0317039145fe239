use core_domain::{DomainError, NotFound};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Password hashing error: {0}")]
    Encryption(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

impl From<NotFound> for IdentityError {
    fn from(error: NotFound) -> Self {
        IdentityError::Domain(error.into())
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(error: serde_json::Error) -> Self {
        IdentityError::Internal(format!("Failed to serialize message: {error}"))
    }
}

impl IdentityError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IdentityError::Domain(domain) if domain.is_not_found())
    }

    /// Domain errors carried by this failure, if it is a domain failure.
    pub fn domain_errors(&self) -> Vec<core_domain::Error> {
        match self {
            IdentityError::Domain(domain) => domain.errors(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;

    #[test]
    fn test_not_found_converts_to_domain_error() {
        let error: IdentityError =
            NotFound::with_id("Account", &AccountId::from_string("acc-1")).into();

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Account with id acc-1 was not found");
        assert_eq!(error.domain_errors().len(), 1);
    }

    #[test]
    fn test_infrastructure_errors_are_not_domain_errors() {
        let error = IdentityError::Gateway("connection refused".to_string());

        assert!(!error.is_not_found());
        assert!(error.domain_errors().is_empty());
        assert_eq!(error.to_string(), "Gateway error: connection refused");
    }
}
