use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AccountId;
use crate::role::RoleId;

/// Facts about an account, published after they are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    Created {
        account_id: AccountId,
        email: String,
        occurred_on: DateTime<Utc>,
    },
    Confirmed {
        account_id: AccountId,
        occurred_on: DateTime<Utc>,
    },
    RoleChanged {
        account_id: AccountId,
        role_id: RoleId,
        occurred_on: DateTime<Utc>,
    },
    PasswordChanged {
        account_id: AccountId,
        occurred_on: DateTime<Utc>,
    },
    Deleted {
        account_id: AccountId,
        occurred_on: DateTime<Utc>,
    },
}

impl AccountEvent {
    pub fn account_id(&self) -> &AccountId {
        match self {
            AccountEvent::Created { account_id, .. }
            | AccountEvent::Confirmed { account_id, .. }
            | AccountEvent::RoleChanged { account_id, .. }
            | AccountEvent::PasswordChanged { account_id, .. }
            | AccountEvent::Deleted { account_id, .. } => account_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccountEvent::Created { .. } => "account.created",
            AccountEvent::Confirmed { .. } => "account.confirmed",
            AccountEvent::RoleChanged { .. } => "account.role_changed",
            AccountEvent::PasswordChanged { .. } => "account.password_changed",
            AccountEvent::Deleted { .. } => "account.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = AccountEvent::Confirmed {
            account_id: AccountId::from_string("acc-1"),
            occurred_on: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "confirmed");
        assert_eq!(json["account_id"], "acc-1");
        assert_eq!(event.name(), "account.confirmed");
        assert_eq!(event.account_id().to_string(), "acc-1");
    }
}
