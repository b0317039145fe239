//! Collaborator contracts the use cases depend on.
//!
//! Storage, hashing, object storage, messaging and caching are implemented
//! outside the domain. The in-memory implementations in [`in_memory`] serve
//! development and tests.

pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;
use core_domain::{Pagination, SearchQuery};

use crate::account::{Account, AccountId};
use crate::account_code::AccountCode;
use crate::account_mail::{AccountMail, AccountMailId};
use crate::error::IdentityResult;
use crate::models::{QueueMessage, Resource};
use crate::permission::{Permission, PermissionId};
use crate::role::{Role, RoleId};

pub use in_memory::{
    InMemoryAccountCodeGateway, InMemoryAccountGateway, InMemoryAccountMailGateway,
    InMemoryAvatarGateway, InMemoryCacheGateway, InMemoryGateways, InMemoryPermissionGateway,
    InMemoryQueueGateway, InMemoryRoleGateway,
};

/// Permission persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionGateway: Send + Sync {
    async fn create(&self, permission: Permission) -> IdentityResult<Permission>;

    async fn update(&self, permission: Permission) -> IdentityResult<Permission>;

    async fn find_by_id(&self, id: &PermissionId) -> IdentityResult<Option<Permission>>;

    /// Permissions among `ids` that exist; unknown ids are skipped.
    async fn find_all_by_ids(&self, ids: &[PermissionId]) -> IdentityResult<Vec<Permission>>;

    async fn exists_by_name(&self, name: &str) -> IdentityResult<bool>;

    async fn find_all(&self, query: SearchQuery) -> IdentityResult<Pagination<Permission>>;

    /// Deleting an unknown id is not an error.
    async fn delete_by_id(&self, id: &PermissionId) -> IdentityResult<()>;
}

/// Role persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleGateway: Send + Sync {
    async fn create(&self, role: Role) -> IdentityResult<Role>;

    async fn update(&self, role: Role) -> IdentityResult<Role>;

    async fn find_by_id(&self, id: &RoleId) -> IdentityResult<Option<Role>>;

    /// The role flagged `is_default`, if any.
    async fn find_default_role(&self) -> IdentityResult<Option<Role>>;

    async fn exists_by_name(&self, name: &str) -> IdentityResult<bool>;

    async fn find_all(&self, query: SearchQuery) -> IdentityResult<Pagination<Role>>;

    async fn delete_by_id(&self, id: &RoleId) -> IdentityResult<()>;
}

/// Account persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn create(&self, account: Account) -> IdentityResult<Account>;

    async fn update(&self, account: Account) -> IdentityResult<Account>;

    async fn find_by_id(&self, id: &AccountId) -> IdentityResult<Option<Account>>;

    /// Lookup by e-mail, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> IdentityResult<Option<Account>>;

    async fn exists_by_email(&self, email: &str) -> IdentityResult<bool>;

    async fn find_all(&self, query: SearchQuery) -> IdentityResult<Pagination<Account>>;

    async fn delete_by_id(&self, id: &AccountId) -> IdentityResult<()>;
}

/// Mailed token persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountMailGateway: Send + Sync {
    async fn create(&self, mail: AccountMail) -> IdentityResult<AccountMail>;

    async fn find_all_by_account_id(&self, account_id: &AccountId)
        -> IdentityResult<Vec<AccountMail>>;

    async fn find_by_token(&self, token: &str) -> IdentityResult<Option<AccountMail>>;

    async fn delete_by_id(&self, id: &AccountMailId) -> IdentityResult<()>;
}

/// Authorization code persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCodeGateway: Send + Sync {
    async fn create(&self, code: AccountCode) -> IdentityResult<AccountCode>;
}

/// Password hashing
#[cfg_attr(test, mockall::automock)]
pub trait EncrypterGateway: Send + Sync {
    fn encrypt(&self, raw: &str) -> IdentityResult<String>;

    fn matches(&self, raw: &str, hash: &str) -> bool;
}

/// Avatar object storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarGateway: Send + Sync {
    /// Store `resource` for `account_id` and return its key.
    async fn save(&self, account_id: &AccountId, resource: Resource) -> IdentityResult<String>;

    async fn delete(&self, key: &str) -> IdentityResult<()>;

    async fn find_avatar_by_key(&self, key: &str) -> IdentityResult<Option<Resource>>;
}

/// Fire-and-forget publication
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueGateway: Send + Sync {
    async fn send(&self, message: QueueMessage) -> IdentityResult<()>;
}

/// Key/value cache in front of a gateway
#[async_trait]
pub trait CacheGateway<T: Send + Sync + 'static>: Send + Sync {
    async fn save(&self, key: &str, value: T) -> IdentityResult<()>;

    async fn get(&self, key: &str) -> IdentityResult<Option<T>>;

    async fn delete(&self, key: &str) -> IdentityResult<()>;
}

/// Every collaborator the identity services need.
#[derive(Clone)]
pub struct Gateways {
    pub accounts: Arc<dyn AccountGateway>,
    pub roles: Arc<dyn RoleGateway>,
    pub permissions: Arc<dyn PermissionGateway>,
    pub mails: Arc<dyn AccountMailGateway>,
    pub codes: Arc<dyn AccountCodeGateway>,
    pub encrypter: Arc<dyn EncrypterGateway>,
    pub avatars: Arc<dyn AvatarGateway>,
    pub queue: Arc<dyn QueueGateway>,
    pub cache: Arc<dyn CacheGateway<Account>>,
}
