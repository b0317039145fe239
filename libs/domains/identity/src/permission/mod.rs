//! Permission aggregate.

mod validator;

use std::convert::Infallible;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use core_domain::{AggregateRoot, DomainResult, Entity, ValidationHandler, Validator};
use serde::{Deserialize, Serialize};

pub use self::validator::{PermissionValidator, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH, NAME_MIN_LENGTH};

core_domain::define_identifier!(
    /// Identifier of a [`Permission`].
    PermissionId
);

/// A named capability that roles grant.
///
/// Name uniqueness is a gateway concern; the aggregate only checks shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Permission {
    /// Build an unvalidated permission; the name is stored trimmed.
    pub fn new_permission(name: impl AsRef<str>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PermissionId::unique(),
            name: name.as_ref().trim().to_string(),
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a stored permission.
    pub fn with(
        id: PermissionId,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            updated_at,
        }
    }

    /// New snapshot with the given description.
    pub fn update(self, description: Option<String>) -> Self {
        Self {
            description,
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Permission {
    type Id = PermissionId;

    fn id(&self) -> &PermissionId {
        &self.id
    }

    fn validate<H: ValidationHandler>(&self, handler: &mut H) -> DomainResult<()> {
        PermissionValidator::new(self, handler).validate()
    }
}

impl AggregateRoot for Permission {
    type Event = Infallible;
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Permission {}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_domain::{FailFastHandler, Identifier, Notification};

    #[test]
    fn test_new_permission() {
        let permission =
            Permission::new_permission("create-role", Some("Create a new role".to_string()));

        assert!(!permission.id().is_blank());
        assert_eq!(permission.name(), "create-role");
        assert_eq!(permission.description(), Some("Create a new role"));
        assert_eq!(permission.created_at(), permission.updated_at());

        let mut notification = Notification::create();
        permission.validate(&mut notification).unwrap();
        assert!(!notification.has_error());
    }

    #[test]
    fn test_new_permission_trims_name() {
        let permission = Permission::new_permission("  read ", None);
        assert_eq!(permission.name(), "read");
    }

    #[test]
    fn test_update_bumps_updated_at_only() {
        let permission = Permission::new_permission("delete-role", None);
        let id = permission.id().clone();
        let created_at = permission.created_at();

        let updated = permission.update(Some("Delete a role".to_string()));

        assert_eq!(updated.id(), &id);
        assert_eq!(updated.created_at(), created_at);
        assert!(updated.updated_at() >= created_at);
        assert_eq!(updated.description(), Some("Delete a role"));
    }

    #[test]
    fn test_equality_by_id() {
        let permission = Permission::new_permission("read", None);
        let renamed = Permission::with(
            permission.id().clone(),
            "write".to_string(),
            None,
            permission.created_at(),
            permission.updated_at(),
        );

        assert_eq!(permission, renamed);
        assert_ne!(permission, Permission::new_permission("read", None));
    }

    #[test]
    fn test_fail_fast_raises_on_blank_name() {
        let permission = Permission::new_permission("", None);

        let error = permission.validate(&mut FailFastHandler).unwrap_err();
        assert_eq!(error.errors()[0].message(), "'name' should not be null or blank");
    }
}
