//! Role aggregate and its permission references.

mod validator;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use core_domain::{AggregateRoot, DomainResult, Entity, ValidationHandler, Validator};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::permission::{Permission, PermissionId};

pub use self::validator::RoleValidator;

core_domain::define_identifier!(
    /// Identifier of a [`Role`].
    RoleId
);

/// Audience a role is meant for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    Employees,
    Common,
}

/// Copy of the permission facts a role needs, keyed by permission id.
///
/// Equality, ordering and hashing use `permission_id` only, so a set of
/// these never holds the same permission twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermission {
    permission_id: PermissionId,
    permission_name: String,
}

impl RolePermission {
    pub fn new(permission_id: PermissionId, permission_name: impl Into<String>) -> Self {
        Self {
            permission_id,
            permission_name: permission_name.into(),
        }
    }

    pub fn permission_id(&self) -> &PermissionId {
        &self.permission_id
    }

    pub fn permission_name(&self) -> &str {
        &self.permission_name
    }
}

impl From<&Permission> for RolePermission {
    fn from(permission: &Permission) -> Self {
        Self::new(permission.id().clone(), permission.name())
    }
}

impl PartialEq for RolePermission {
    fn eq(&self, other: &Self) -> bool {
        self.permission_id == other.permission_id
    }
}

impl Eq for RolePermission {}

impl PartialOrd for RolePermission {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RolePermission {
    fn cmp(&self, other: &Self) -> Ordering {
        self.permission_id.cmp(&other.permission_id)
    }
}

impl Hash for RolePermission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.permission_id.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    description: Option<String>,
    role_type: RoleType,
    is_default: bool,
    permissions: BTreeSet<RolePermission>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Build an unvalidated role granting `permissions`.
    ///
    /// Whether `is_default` may be set is decided by the caller: only one
    /// default role may exist, and the aggregate cannot see the others.
    pub fn new_role(
        name: impl AsRef<str>,
        description: Option<String>,
        role_type: RoleType,
        is_default: bool,
        permissions: impl IntoIterator<Item = RolePermission>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RoleId::unique(),
            name: name.as_ref().trim().to_string(),
            description,
            role_type,
            is_default,
            permissions: permissions.into_iter().collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a stored role.
    #[allow(clippy::too_many_arguments)]
    pub fn with(
        id: RoleId,
        name: String,
        description: Option<String>,
        role_type: RoleType,
        is_default: bool,
        permissions: BTreeSet<RolePermission>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            role_type,
            is_default,
            permissions,
            created_at,
            updated_at,
        }
    }

    /// Union with `permissions`; already granted ones are kept once.
    pub fn add_permissions(mut self, permissions: impl IntoIterator<Item = RolePermission>) -> Self {
        self.permissions.extend(permissions);
        self.updated_at = Utc::now();
        self
    }

    /// Drop `permission`; removing one that is not granted changes nothing.
    pub fn remove_permission(mut self, permission: &RolePermission) -> Self {
        if self.permissions.remove(permission) {
            self.updated_at = Utc::now();
        }
        self
    }

    /// Replace every mutable attribute at once; the name is stored trimmed.
    pub fn update(
        self,
        name: impl AsRef<str>,
        description: Option<String>,
        role_type: RoleType,
        is_default: bool,
        permissions: BTreeSet<RolePermission>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            description,
            role_type,
            is_default,
            permissions,
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

    pub fn role_type(&self) -> RoleType {
        self.role_type
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn permissions(&self) -> &BTreeSet<RolePermission> {
        &self.permissions
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|p| p.permission_name == name)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &RoleId {
        &self.id
    }

    fn validate<H: ValidationHandler>(&self, handler: &mut H) -> DomainResult<()> {
        RoleValidator::new(self, handler).validate()
    }
}

impl AggregateRoot for Role {
    type Event = Infallible;
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
