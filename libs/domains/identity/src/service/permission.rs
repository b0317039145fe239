use std::sync::Arc;

use core_domain::{
    Either, Entity, Error, NotFound, Notification, Pagination, SearchQuery, ValidationHandler,
};

use super::{collect, PERMISSION_ALREADY_EXISTS};
use crate::error::IdentityResult;
use crate::gateway::{Gateways, PermissionGateway};
use crate::models::CreatePermission;
use crate::permission::{Permission, PermissionId};

/// Service layer for Permission business logic
#[derive(Clone)]
pub struct PermissionService {
    permissions: Arc<dyn PermissionGateway>,
}

impl PermissionService {
    pub fn new(gateways: &Gateways) -> Self {
        Self {
            permissions: gateways.permissions.clone(),
        }
    }

    /// Create a permission with a unique name
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: CreatePermission,
    ) -> IdentityResult<Either<Notification, Permission>> {
        let permission = Permission::new_permission(input.name, input.description);

        let mut notification = collect(&permission)?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        if self.permissions.exists_by_name(permission.name()).await? {
            notification.append(Error::new(PERMISSION_ALREADY_EXISTS))?;
            return Ok(Either::left(notification));
        }

        let created = self.permissions.create(permission).await?;
        tracing::info!(permission_id = %created.id(), "Permission created");
        Ok(Either::right(created))
    }

    /// Replace the description of a permission
    #[tracing::instrument(skip(self, description))]
    pub async fn update(
        &self,
        id: &PermissionId,
        description: Option<String>,
    ) -> IdentityResult<Either<Notification, Permission>> {
        let permission = self.get(id).await?.update(description);

        let notification = collect(&permission)?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        let updated = self.permissions.update(permission).await?;
        Ok(Either::right(updated))
    }

    /// Get a permission by ID
    pub async fn get(&self, id: &PermissionId) -> IdentityResult<Permission> {
        self.permissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| NotFound::with_id("Permission", id).into())
    }

    /// List permissions
    pub async fn list(&self, query: SearchQuery) -> IdentityResult<Pagination<Permission>> {
        self.permissions.find_all(query).await
    }

    /// Delete a permission; unknown ids are ignored
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &PermissionId) -> IdentityResult<()> {
        self.permissions.delete_by_id(id).await
    }
}
