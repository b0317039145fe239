//! In-memory gateways (for development/testing)

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use core_domain::{Direction, Entity, NotFound, Pagination, SearchQuery};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AccountCodeGateway, AccountGateway, AccountMailGateway, AvatarGateway, CacheGateway,
    EncrypterGateway, Gateways, PermissionGateway, QueueGateway, RoleGateway,
};
use crate::account::{Account, AccountId};
use crate::account_code::{AccountCode, AccountCodeId};
use crate::account_mail::{AccountMail, AccountMailId};
use crate::encrypter::Argon2Encrypter;
use crate::error::{IdentityError, IdentityResult};
use crate::models::{QueueMessage, Resource};
use crate::permission::{Permission, PermissionId};
use crate::role::{Role, RoleId};

fn matches_terms(terms: &str, fields: &[&str]) -> bool {
    let terms = terms.trim().to_lowercase();
    terms.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&terms))
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn duplicate(kind: &str, field: &str, value: &str) -> IdentityError {
    IdentityError::Gateway(format!("{kind} with {field} {value} already exists"))
}

/// In-memory implementation of PermissionGateway
#[derive(Debug, Default, Clone)]
pub struct InMemoryPermissionGateway {
    permissions: Arc<RwLock<HashMap<PermissionId, Permission>>>,
}

impl InMemoryPermissionGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionGateway for InMemoryPermissionGateway {
    async fn create(&self, permission: Permission) -> IdentityResult<Permission> {
        let mut permissions = self.permissions.write().await;

        let name_taken = permissions
            .values()
            .any(|p| p.name().eq_ignore_ascii_case(permission.name()));
        if name_taken {
            return Err(duplicate("Permission", "name", permission.name()));
        }

        permissions.insert(permission.id().clone(), permission.clone());

        tracing::info!(permission_id = %permission.id(), name = %permission.name(), "Created permission");
        Ok(permission)
    }

    async fn update(&self, permission: Permission) -> IdentityResult<Permission> {
        let mut permissions = self.permissions.write().await;

        if !permissions.contains_key(permission.id()) {
            return Err(NotFound::with_id("Permission", permission.id()).into());
        }
        permissions.insert(permission.id().clone(), permission.clone());

        tracing::info!(permission_id = %permission.id(), "Updated permission");
        Ok(permission)
    }

    async fn find_by_id(&self, id: &PermissionId) -> IdentityResult<Option<Permission>> {
        let permissions = self.permissions.read().await;
        Ok(permissions.get(id).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[PermissionId]) -> IdentityResult<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        let mut found: Vec<Permission> = Vec::new();
        for id in ids {
            if let Some(permission) = permissions.get(id) {
                if !found.contains(permission) {
                    found.push(permission.clone());
                }
            }
        }
        Ok(found)
    }

    async fn exists_by_name(&self, name: &str) -> IdentityResult<bool> {
        let permissions = self.permissions.read().await;
        Ok(permissions
            .values()
            .any(|p| p.name().eq_ignore_ascii_case(name.trim())))
    }

    async fn find_all(&self, query: SearchQuery) -> IdentityResult<Pagination<Permission>> {
        let permissions = self.permissions.read().await;

        let mut result: Vec<Permission> = permissions
            .values()
            .filter(|p| {
                matches_terms(
                    &query.terms,
                    &[p.name(), p.description().unwrap_or_default()],
                )
            })
            .cloned()
            .collect();

        match query.sort.as_str() {
            "name" => result.sort_by(|a, b| {
                directed(a.name().to_lowercase().cmp(&b.name().to_lowercase()), query.direction)
            }),
            _ => result.sort_by(|a, b| directed(a.created_at().cmp(&b.created_at()), query.direction)),
        }

        Ok(query.paginate(result))
    }

    async fn delete_by_id(&self, id: &PermissionId) -> IdentityResult<()> {
        let mut permissions = self.permissions.write().await;
        if permissions.remove(id).is_some() {
            tracing::info!(permission_id = %id, "Deleted permission");
        }
        Ok(())
    }
}

/// In-memory implementation of RoleGateway
#[derive(Debug, Default, Clone)]
pub struct InMemoryRoleGateway {
    roles: Arc<RwLock<HashMap<RoleId, Role>>>,
}

impl InMemoryRoleGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleGateway for InMemoryRoleGateway {
    async fn create(&self, role: Role) -> IdentityResult<Role> {
        let mut roles = self.roles.write().await;

        if roles.values().any(|r| r.name().eq_ignore_ascii_case(role.name())) {
            return Err(duplicate("Role", "name", role.name()));
        }

        roles.insert(role.id().clone(), role.clone());

        tracing::info!(role_id = %role.id(), name = %role.name(), is_default = role.is_default(), "Created role");
        Ok(role)
    }

    async fn update(&self, role: Role) -> IdentityResult<Role> {
        let mut roles = self.roles.write().await;

        if !roles.contains_key(role.id()) {
            return Err(NotFound::with_id("Role", role.id()).into());
        }
        roles.insert(role.id().clone(), role.clone());

        tracing::info!(role_id = %role.id(), "Updated role");
        Ok(role)
    }

    async fn find_by_id(&self, id: &RoleId) -> IdentityResult<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.get(id).cloned())
    }

    async fn find_default_role(&self) -> IdentityResult<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.values().find(|r| r.is_default()).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> IdentityResult<bool> {
        let roles = self.roles.read().await;
        Ok(roles.values().any(|r| r.name().eq_ignore_ascii_case(name.trim())))
    }

    async fn find_all(&self, query: SearchQuery) -> IdentityResult<Pagination<Role>> {
        let roles = self.roles.read().await;

        let mut result: Vec<Role> = roles
            .values()
            .filter(|r| matches_terms(&query.terms, &[r.name(), r.description().unwrap_or_default()]))
            .cloned()
            .collect();

        match query.sort.as_str() {
            "name" => result.sort_by(|a, b| {
                directed(a.name().to_lowercase().cmp(&b.name().to_lowercase()), query.direction)
            }),
            _ => result.sort_by(|a, b| directed(a.created_at().cmp(&b.created_at()), query.direction)),
        }

        Ok(query.paginate(result))
    }

    async fn delete_by_id(&self, id: &RoleId) -> IdentityResult<()> {
        let mut roles = self.roles.write().await;
        if roles.remove(id).is_some() {
            tracing::info!(role_id = %id, "Deleted role");
        }
        Ok(())
    }
}

/// In-memory implementation of AccountGateway
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountGateway {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl InMemoryAccountGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountGateway for InMemoryAccountGateway {
    async fn create(&self, account: Account) -> IdentityResult<Account> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email().eq_ignore_ascii_case(account.email())) {
            return Err(duplicate("Account", "email", account.email()));
        }

        accounts.insert(account.id().clone(), account.clone());

        tracing::info!(account_id = %account.id(), email = %account.email(), "Created account");
        Ok(account)
    }

    async fn update(&self, account: Account) -> IdentityResult<Account> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(account.id()) {
            return Err(NotFound::with_id("Account", account.id()).into());
        }

        let email_taken = accounts
            .values()
            .any(|a| a.id() != account.id() && a.email().eq_ignore_ascii_case(account.email()));
        if email_taken {
            return Err(duplicate("Account", "email", account.email()));
        }

        accounts.insert(account.id().clone(), account.clone());

        tracing::info!(account_id = %account.id(), "Updated account");
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> IdentityResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> IdentityResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email().eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> IdentityResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn find_all(&self, query: SearchQuery) -> IdentityResult<Pagination<Account>> {
        let accounts = self.accounts.read().await;

        let mut result: Vec<Account> = accounts
            .values()
            .filter(|a| {
                matches_terms(&query.terms, &[a.email(), a.first_name(), a.last_name()])
            })
            .cloned()
            .collect();

        match query.sort.as_str() {
            "email" => result.sort_by(|a, b| {
                directed(a.email().to_lowercase().cmp(&b.email().to_lowercase()), query.direction)
            }),
            _ => result.sort_by(|a, b| directed(a.created_at().cmp(&b.created_at()), query.direction)),
        }

        Ok(query.paginate(result))
    }

    async fn delete_by_id(&self, id: &AccountId) -> IdentityResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.remove(id).is_some() {
            tracing::info!(account_id = %id, "Deleted account");
        }
        Ok(())
    }
}

/// In-memory implementation of AccountMailGateway
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountMailGateway {
    mails: Arc<RwLock<HashMap<AccountMailId, AccountMail>>>,
}

impl InMemoryAccountMailGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountMailGateway for InMemoryAccountMailGateway {
    async fn create(&self, mail: AccountMail) -> IdentityResult<AccountMail> {
        let mut mails = self.mails.write().await;

        if mails.values().any(|m| m.token() == mail.token()) {
            return Err(IdentityError::Gateway("AccountMail token already exists".to_string()));
        }

        mails.insert(mail.id().clone(), mail.clone());

        tracing::info!(
            mail_id = %mail.id(),
            account_id = %mail.account().id(),
            token_type = %mail.mail_type(),
            "Created account mail"
        );
        Ok(mail)
    }

    async fn find_all_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> IdentityResult<Vec<AccountMail>> {
        let mails = self.mails.read().await;

        let mut result: Vec<AccountMail> = mails
            .values()
            .filter(|m| m.account().id() == account_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.created_at());

        Ok(result)
    }

    async fn find_by_token(&self, token: &str) -> IdentityResult<Option<AccountMail>> {
        let mails = self.mails.read().await;
        Ok(mails.values().find(|m| m.token() == token).cloned())
    }

    async fn delete_by_id(&self, id: &AccountMailId) -> IdentityResult<()> {
        let mut mails = self.mails.write().await;
        if mails.remove(id).is_some() {
            tracing::info!(mail_id = %id, "Deleted account mail");
        }
        Ok(())
    }
}

/// In-memory implementation of AccountCodeGateway
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountCodeGateway {
    codes: Arc<RwLock<HashMap<AccountCodeId, AccountCode>>>,
}

impl InMemoryAccountCodeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_code(&self, code: &str) -> Option<AccountCode> {
        let codes = self.codes.read().await;
        codes.values().find(|c| c.code() == code).cloned()
    }
}

#[async_trait]
impl AccountCodeGateway for InMemoryAccountCodeGateway {
    async fn create(&self, code: AccountCode) -> IdentityResult<AccountCode> {
        let mut codes = self.codes.write().await;

        if codes.values().any(|c| c.code() == code.code()) {
            return Err(IdentityError::Gateway("AccountCode code already exists".to_string()));
        }

        codes.insert(code.id().clone(), code.clone());

        tracing::info!(code_id = %code.id(), account_id = %code.account_id(), "Created account code");
        Ok(code)
    }
}

/// In-memory implementation of AvatarGateway
#[derive(Debug, Default, Clone)]
pub struct InMemoryAvatarGateway {
    objects: Arc<RwLock<HashMap<String, Resource>>>,
}

impl InMemoryAvatarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl AvatarGateway for InMemoryAvatarGateway {
    async fn save(&self, account_id: &AccountId, resource: Resource) -> IdentityResult<String> {
        let key = format!("avatars/{account_id}/{}", Uuid::now_v7().simple());

        let mut objects = self.objects.write().await;
        objects.insert(key.clone(), resource);

        tracing::info!(account_id = %account_id, key = %key, "Stored avatar");
        Ok(key)
    }

    async fn delete(&self, key: &str) -> IdentityResult<()> {
        let mut objects = self.objects.write().await;
        if objects.remove(key).is_some() {
            tracing::info!(key = %key, "Deleted avatar");
        }
        Ok(())
    }

    async fn find_avatar_by_key(&self, key: &str) -> IdentityResult<Option<Resource>> {
        let objects = self.objects.read().await;
        Ok(objects.get(key).cloned())
    }
}

/// In-memory implementation of QueueGateway that records every message
#[derive(Debug, Default, Clone)]
pub struct InMemoryQueueGateway {
    sent: Arc<RwLock<Vec<QueueMessage>>>,
}

impl InMemoryQueueGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub async fn sent(&self) -> Vec<QueueMessage> {
        self.sent.read().await.clone()
    }

    /// Messages sent to `queue`, oldest first.
    pub async fn sent_to(&self, queue: &str) -> Vec<QueueMessage> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| m.queue == queue)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl QueueGateway for InMemoryQueueGateway {
    async fn send(&self, message: QueueMessage) -> IdentityResult<()> {
        tracing::debug!(queue = %message.queue, kind = %message.kind, "Queued message");
        self.sent.write().await.push(message);
        Ok(())
    }
}

/// In-memory implementation of CacheGateway
#[derive(Debug, Clone)]
pub struct InMemoryCacheGateway<T> {
    entries: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> Default for InMemoryCacheGateway<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> InMemoryCacheGateway<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> CacheGateway<T> for InMemoryCacheGateway<T> {
    async fn save(&self, key: &str, value: T) -> IdentityResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> IdentityResult<Option<T>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> IdentityResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// A complete set of in-memory gateways, kept concrete so tests can inspect
/// them after driving the services.
#[derive(Clone, Default)]
pub struct InMemoryGateways {
    pub accounts: Arc<InMemoryAccountGateway>,
    pub roles: Arc<InMemoryRoleGateway>,
    pub permissions: Arc<InMemoryPermissionGateway>,
    pub mails: Arc<InMemoryAccountMailGateway>,
    pub codes: Arc<InMemoryAccountCodeGateway>,
    pub avatars: Arc<InMemoryAvatarGateway>,
    pub queue: Arc<InMemoryQueueGateway>,
    pub cache: Arc<InMemoryCacheGateway<Account>>,
    pub encrypter: Arc<Argon2Encrypter>,
}

impl InMemoryGateways {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trait-object view handed to the services.
    pub fn gateways(&self) -> Gateways {
        self.gateways_with_encrypter(self.encrypter.clone())
    }

    /// Same, with a different password hasher.
    pub fn gateways_with_encrypter(&self, encrypter: Arc<dyn EncrypterGateway>) -> Gateways {
        Gateways {
            accounts: self.accounts.clone(),
            roles: self.roles.clone(),
            permissions: self.permissions.clone(),
            mails: self.mails.clone(),
            codes: self.codes.clone(),
            encrypter,
            avatars: self.avatars.clone(),
            queue: self.queue.clone(),
            cache: self.cache.clone(),
        }
    }
}
