//! Single-use tokens mailed to an account owner.
//!
//! At most one token per `(account, mail_type)` is outstanding: issuing a new
//! one deletes the previous ones first. Expiry is evaluated lazily when the
//! token is presented, and a consumed token is deleted.

mod validator;

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use core_domain::{AggregateRoot, DomainResult, Entity, Recorded, ValidationHandler, Validator};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::account::{Account, AccountId};

pub use self::validator::AccountMailValidator;

core_domain::define_identifier!(
    /// Identifier of an [`AccountMail`].
    AccountMailId
);

/// Purpose of a mailed token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountMailType {
    AccountConfirmation,
    PasswordReset,
}

/// Raised when a token was issued; consumers render and send the mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountMailEvent {
    Issued {
        mail_id: AccountMailId,
        account_id: AccountId,
        email: String,
        first_name: String,
        full_name: String,
        token: String,
        mail_type: AccountMailType,
        expires_at: DateTime<Utc>,
        occurred_on: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMail {
    id: AccountMailId,
    token: String,
    mail_type: AccountMailType,
    account: Account,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountMail {
    /// Build an unvalidated token for `account`, raising `Issued`.
    pub fn new_account_mail(
        token: impl Into<String>,
        mail_type: AccountMailType,
        account: Account,
        expires_at: DateTime<Utc>,
    ) -> Recorded<Self> {
        let now = Utc::now();
        let mail = Self {
            id: AccountMailId::unique(),
            token: token.into(),
            mail_type,
            account,
            expires_at,
            created_at: now,
            updated_at: now,
        };

        let event = AccountMailEvent::Issued {
            mail_id: mail.id.clone(),
            account_id: mail.account.id().clone(),
            email: mail.account.email().to_string(),
            first_name: mail.account.first_name().to_string(),
            full_name: mail.account.full_name(),
            token: mail.token.clone(),
            mail_type,
            expires_at,
            occurred_on: now,
        };
        Recorded::with_event(mail, event)
    }

    /// Rehydrate a stored token.
    pub fn with(
        id: AccountMailId,
        token: String,
        mail_type: AccountMailType,
        account: Account,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            token,
            mail_type,
            account,
            expires_at,
            created_at,
            updated_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A token is no longer usable from its expiry instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn mail_type(&self) -> AccountMailType {
        self.mail_type
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for AccountMail {
    type Id = AccountMailId;

    fn id(&self) -> &AccountMailId {
        &self.id
    }

    fn validate<H: ValidationHandler>(&self, handler: &mut H) -> DomainResult<()> {
        AccountMailValidator::new(self, handler).validate()
    }
}

impl AggregateRoot for AccountMail {
    type Event = AccountMailEvent;
}

impl PartialEq for AccountMail {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AccountMail {}

impl Hash for AccountMail {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
