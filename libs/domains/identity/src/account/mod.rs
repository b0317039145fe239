//! Account aggregate.

mod events;
mod validator;

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use core_domain::{AggregateRoot, DomainResult, Entity, Recorded, ValidationHandler, Validator};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::role::Role;

pub use events::AccountEvent;
pub use self::validator::AccountValidator;

core_domain::define_identifier!(
    /// Identifier of an [`Account`].
    AccountId
);

/// Whether the owner proved possession of the e-mail address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MailStatus {
    WaitingConfirmation,
    Confirmed,
}

/// A user account.
///
/// `password` holds whatever the caller put there: the raw password right
/// after [`Account::new_account`] (so its length can be validated), a hash
/// once the use case encrypted it. The role is a value copy taken when it was
/// assigned.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    avatar_url: Option<String>,
    mail_status: MailStatus,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Build an unvalidated account waiting for mail confirmation.
    pub fn new_account(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Recorded<Self> {
        let now = Utc::now();
        let account = Self {
            id: AccountId::unique(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            avatar_url: None,
            mail_status: MailStatus::WaitingConfirmation,
            role,
            created_at: now,
            updated_at: now,
        };

        let event = AccountEvent::Created {
            account_id: account.id.clone(),
            email: account.email.clone(),
            occurred_on: now,
        };
        Recorded::with_event(account, event)
    }

    /// Rehydrate a stored account.
    #[allow(clippy::too_many_arguments)]
    pub fn with(
        id: AccountId,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        avatar_url: Option<String>,
        mail_status: MailStatus,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password,
            avatar_url,
            mail_status,
            role,
            created_at,
            updated_at,
        }
    }

    /// Mark the e-mail address as confirmed.
    pub fn confirm(self) -> Recorded<Self> {
        let now = Utc::now();
        let account = Self {
            mail_status: MailStatus::Confirmed,
            updated_at: now,
            ..self
        };
        let event = AccountEvent::Confirmed {
            account_id: account.id.clone(),
            occurred_on: now,
        };
        Recorded::with_event(account, event)
    }

    /// Assign an already resolved role.
    pub fn change_role(self, role: Role) -> Recorded<Self> {
        let now = Utc::now();
        let event = AccountEvent::RoleChanged {
            account_id: self.id.clone(),
            role_id: role.id().clone(),
            occurred_on: now,
        };
        let account = Self {
            role,
            updated_at: now,
            ..self
        };
        Recorded::with_event(account, event)
    }

    /// Replace password and avatar; raises `PasswordChanged` when the
    /// password actually differs.
    pub fn update(self, password: impl Into<String>, avatar_url: Option<String>) -> Recorded<Self> {
        let now = Utc::now();
        let password = password.into();
        let changed = password != self.password;
        let account = Self {
            password,
            avatar_url,
            updated_at: now,
            ..self
        };

        if changed {
            let event = AccountEvent::PasswordChanged {
                account_id: account.id.clone(),
                occurred_on: now,
            };
            Recorded::with_event(account, event)
        } else {
            Recorded::unchanged(account)
        }
    }

    pub fn change_avatar_url(self, avatar_url: Option<String>) -> Self {
        Self {
            avatar_url,
            updated_at: Utc::now(),
            ..self
        }
    }

    /// Swap the validated raw password for its hash before persisting.
    pub(crate) fn with_encrypted_password(self, hash: String) -> Self {
        Self {
            password: hash,
            ..self
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn mail_status(&self) -> MailStatus {
        self.mail_status
    }

    pub fn is_confirmed(&self) -> bool {
        self.mail_status == MailStatus::Confirmed
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("avatar_url", &self.avatar_url)
            .field("mail_status", &self.mail_status)
            .field("role", &self.role.id())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }

    fn validate<H: ValidationHandler>(&self, handler: &mut H) -> DomainResult<()> {
        AccountValidator::new(self, handler).validate()
    }
}

impl AggregateRoot for Account {
    type Event = AccountEvent;
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
