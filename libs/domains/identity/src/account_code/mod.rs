//! Authorization code bound to an account and its PKCE code challenge.

mod validator;

use std::convert::Infallible;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use core_domain::{AggregateRoot, DomainResult, Entity, ValidationHandler, Validator};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

pub use self::validator::AccountCodeValidator;

core_domain::define_identifier!(
    /// Identifier of an [`AccountCode`].
    AccountCodeId
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCode {
    id: AccountCodeId,
    code: String,
    code_challenge: String,
    account_id: AccountId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountCode {
    pub fn new_account_code(
        code: impl Into<String>,
        code_challenge: impl Into<String>,
        account_id: AccountId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountCodeId::unique(),
            code: code.into(),
            code_challenge: code_challenge.into(),
            account_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a stored code.
    pub fn with(
        id: AccountCodeId,
        code: String,
        code_challenge: String,
        account_id: AccountId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            code_challenge,
            account_id,
            created_at,
            updated_at,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for AccountCode {
    type Id = AccountCodeId;

    fn id(&self) -> &AccountCodeId {
        &self.id
    }

    fn validate<H: ValidationHandler>(&self, handler: &mut H) -> DomainResult<()> {
        AccountCodeValidator::new(self, handler).validate()
    }
}

impl AggregateRoot for AccountCode {
    type Event = Infallible;
}

impl PartialEq for AccountCode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AccountCode {}

impl Hash for AccountCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_domain::Identifier;

    #[test]
    fn test_new_account_code() {
        let account_id = AccountId::unique();
        let code = AccountCode::new_account_code("code-1", "challenge", account_id.clone());

        assert!(!code.id().is_blank());
        assert_eq!(code.code(), "code-1");
        assert_eq!(code.code_challenge(), "challenge");
        assert_eq!(code.account_id(), &account_id);
        assert_eq!(code.created_at(), code.updated_at());
    }
}
