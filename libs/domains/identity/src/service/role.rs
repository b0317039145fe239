use std::collections::BTreeSet;
use std::sync::Arc;

use core_domain::{
    Either, Entity, Error, FailFastHandler, NotFound, Notification, Pagination, SearchQuery,
    ValidationHandler,
};

use super::{collect, DEFAULT_ROLE_ALREADY_EXISTS, ROLE_ALREADY_EXISTS};
use crate::error::IdentityResult;
use crate::gateway::{Gateways, PermissionGateway, RoleGateway};
use crate::models::{CreateRole, UpdateRole};
use crate::permission::PermissionId;
use crate::role::{Role, RoleId, RolePermission};

/// Service layer for Role business logic
#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleGateway>,
    permissions: Arc<dyn PermissionGateway>,
}

impl RoleService {
    pub fn new(gateways: &Gateways) -> Self {
        Self {
            roles: gateways.roles.clone(),
            permissions: gateways.permissions.clone(),
        }
    }

    /// Create a role; at most one role may be the default
    #[tracing::instrument(skip(self, input), fields(name = %input.name, is_default = input.is_default))]
    pub async fn create(&self, input: CreateRole) -> IdentityResult<Either<Notification, Role>> {
        let permissions = self.resolve_permissions(&input.permission_ids).await?;

        let role = Role::new_role(
            &input.name,
            input.description,
            input.role_type,
            input.is_default,
            permissions,
        );

        let mut notification = collect(&role)?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        if role.is_default() && self.roles.find_default_role().await?.is_some() {
            notification.append(Error::new(DEFAULT_ROLE_ALREADY_EXISTS))?;
        }
        if self.roles.exists_by_name(role.name()).await? {
            notification.append(Error::new(ROLE_ALREADY_EXISTS))?;
        }
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        let created = self.roles.create(role).await?;
        tracing::info!(role_id = %created.id(), "Role created");
        Ok(Either::right(created))
    }

    /// Replace name, description, type, default flag and permissions at once
    #[tracing::instrument(skip(self, input), fields(name = %input.name, is_default = input.is_default))]
    pub async fn update(
        &self,
        id: &RoleId,
        input: UpdateRole,
    ) -> IdentityResult<Either<Notification, Role>> {
        let role = self.get(id).await?;
        let previous_name = role.name().to_string();
        let permissions = self.resolve_permissions(&input.permission_ids).await?;

        let role = role.update(
            input.name,
            input.description,
            input.role_type,
            input.is_default,
            permissions,
        );

        let mut notification = collect(&role)?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        if role.is_default() {
            let other_default = self
                .roles
                .find_default_role()
                .await?
                .is_some_and(|default| default.id() != id);
            if other_default {
                notification.append(Error::new(DEFAULT_ROLE_ALREADY_EXISTS))?;
            }
        }
        let renamed = !previous_name.eq_ignore_ascii_case(role.name());
        if renamed && self.roles.exists_by_name(role.name()).await? {
            notification.append(Error::new(ROLE_ALREADY_EXISTS))?;
        }
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        let updated = self.roles.update(role).await?;
        Ok(Either::right(updated))
    }

    /// Grant more permissions; already granted ones are kept once
    #[tracing::instrument(skip(self, permission_ids))]
    pub async fn add_permissions(
        &self,
        id: &RoleId,
        permission_ids: &[PermissionId],
    ) -> IdentityResult<Role> {
        let permissions = self.resolve_permissions(permission_ids).await?;
        let role = self.get(id).await?.add_permissions(permissions);

        role.validate(&mut FailFastHandler)?;
        self.roles.update(role).await
    }

    /// Revoke one permission; revoking one that is not granted writes nothing
    #[tracing::instrument(skip(self))]
    pub async fn remove_permission(
        &self,
        id: &RoleId,
        permission_id: &PermissionId,
    ) -> IdentityResult<Role> {
        let role = self.get(id).await?;

        let Some(granted) = role
            .permissions()
            .iter()
            .find(|p| p.permission_id() == permission_id)
            .cloned()
        else {
            tracing::debug!(role_id = %id, permission_id = %permission_id, "Permission not granted");
            return Ok(role);
        };

        let role = role.remove_permission(&granted);
        role.validate(&mut FailFastHandler)?;
        self.roles.update(role).await
    }

    /// Get a role by ID
    pub async fn get(&self, id: &RoleId) -> IdentityResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| NotFound::with_id("Role", id).into())
    }

    /// List roles
    pub async fn list(&self, query: SearchQuery) -> IdentityResult<Pagination<Role>> {
        self.roles.find_all(query).await
    }

    /// Delete a role; unknown ids are ignored
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &RoleId) -> IdentityResult<()> {
        self.roles.delete_by_id(id).await
    }

    /// Copy the referenced permissions; every id must exist.
    async fn resolve_permissions(
        &self,
        ids: &[PermissionId],
    ) -> IdentityResult<BTreeSet<RolePermission>> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let found = self.permissions.find_all_by_ids(ids).await?;
        if let Some(missing) = ids.iter().find(|id| !found.iter().any(|p| p.id() == *id)) {
            return Err(NotFound::with_id("Permission", missing).into());
        }

        Ok(found.iter().map(RolePermission::from).collect())
    }
}
