use std::sync::Arc;

use chrono::Utc;
use core_domain::{
    Either, Entity, Error, FailFastHandler, Identifier, NotFound, Notification, Pagination,
    Recorded, SearchQuery, ValidationHandler,
};

use super::account_mail::AccountMailService;
use super::{
    collect, publish, rejected, ACCOUNT_NOT_CONFIRMED, EMAIL_ALREADY_EXISTS, INVALID_CREDENTIALS,
};
use crate::account::{Account, AccountEvent, AccountId};
use crate::account_mail::AccountMailType;
use crate::config::IdentityConfig;
use crate::error::IdentityResult;
use crate::gateway::{
    AccountGateway, AccountMailGateway, AvatarGateway, CacheGateway, EncrypterGateway, Gateways,
    QueueGateway, RoleGateway,
};
use crate::models::{CreateAccount, Resource};
use crate::role::{Role, RoleId};

/// Validate a new raw password for `account` and swap it for its hash.
///
/// Nothing is hashed when the password is rejected.
pub(super) fn change_password(
    account: Account,
    raw: &str,
    encrypter: &dyn EncrypterGateway,
) -> IdentityResult<Either<Notification, Recorded<Account>>> {
    let avatar_url = account.avatar_url().map(str::to_string);
    let recorded = account.update(raw, avatar_url);

    let notification = collect(recorded.aggregate())?;
    if notification.has_error() {
        return Ok(Either::left(notification));
    }

    let hash = encrypter.encrypt(raw)?;
    let (account, events) = recorded.into_parts();
    Ok(Either::right(Recorded::new(
        account.with_encrypted_password(hash),
        events,
    )))
}

/// Service layer for Account business logic
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountGateway>,
    roles: Arc<dyn RoleGateway>,
    mails: Arc<dyn AccountMailGateway>,
    encrypter: Arc<dyn EncrypterGateway>,
    avatars: Arc<dyn AvatarGateway>,
    queue: Arc<dyn QueueGateway>,
    cache: Arc<dyn CacheGateway<Account>>,
    mail: AccountMailService,
    config: IdentityConfig,
}

impl AccountService {
    pub fn new(gateways: &Gateways, config: IdentityConfig) -> Self {
        Self {
            accounts: gateways.accounts.clone(),
            roles: gateways.roles.clone(),
            mails: gateways.mails.clone(),
            encrypter: gateways.encrypter.clone(),
            avatars: gateways.avatars.clone(),
            queue: gateways.queue.clone(),
            cache: gateways.cache.clone(),
            mail: AccountMailService::new(gateways, config.clone()),
            config,
        }
    }

    /// Create an account waiting for confirmation and mail it a token
    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: CreateAccount) -> IdentityResult<Either<Notification, Account>> {
        let role = self.resolve_role(input.role_id.as_ref()).await?;

        let recorded = Account::new_account(
            input.first_name,
            input.last_name,
            input.email,
            input.password.as_str(),
            role,
        );

        let mut notification = collect(recorded.aggregate())?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        if self
            .accounts
            .exists_by_email(recorded.aggregate().email())
            .await?
        {
            notification.append(Error::new(EMAIL_ALREADY_EXISTS))?;
            return Ok(Either::left(notification));
        }

        let hash = self.encrypter.encrypt(&input.password)?;
        let (account, events) = recorded.into_parts();
        let created = self
            .accounts
            .create(account.with_encrypted_password(hash))
            .await?;
        self.publish(&events).await?;

        if let Either::Left(notification) = self
            .mail
            .issue_for(&created, AccountMailType::AccountConfirmation)
            .await?
        {
            notification.into_result()?;
        }

        tracing::info!(account_id = %created.id(), role_id = %created.role().id(), "Account created");
        Ok(Either::right(created))
    }

    /// Get an account by ID, through the cache
    pub async fn get(&self, id: &AccountId) -> IdentityResult<Account> {
        match self.cache.get(id.value()).await {
            Ok(Some(account)) => {
                tracing::debug!(account_id = %id, "Account cache hit");
                return Ok(account);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(account_id = %id, error = %error, "Account cache lookup failed");
            }
        }

        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| NotFound::with_id("Account", id))?;

        if let Err(error) = self.cache.save(id.value(), account.clone()).await {
            tracing::warn!(account_id = %id, error = %error, "Failed to cache account");
        }
        Ok(account)
    }

    /// List accounts
    pub async fn list(&self, query: SearchQuery) -> IdentityResult<Pagination<Account>> {
        self.accounts.find_all(query).await
    }

    /// Replace the password of an account
    #[tracing::instrument(skip(self, new_password))]
    pub async fn update_password(
        &self,
        id: &AccountId,
        new_password: &str,
    ) -> IdentityResult<Either<Notification, Account>> {
        let account = self.find(id).await?;

        match change_password(account, new_password, self.encrypter.as_ref())? {
            Either::Left(notification) => Ok(Either::left(notification)),
            Either::Right(recorded) => Ok(Either::right(self.store(recorded).await?)),
        }
    }

    /// Assign another existing role
    #[tracing::instrument(skip(self))]
    pub async fn change_role(&self, id: &AccountId, role_id: &RoleId) -> IdentityResult<Account> {
        let account = self.find(id).await?;
        let role = self.resolve_role(Some(role_id)).await?;

        let recorded = account.change_role(role);
        recorded.aggregate().validate(&mut FailFastHandler)?;
        self.store(recorded).await
    }

    /// Store a new avatar and drop the previous one
    #[tracing::instrument(skip(self, resource), fields(file_name = %resource.file_name))]
    pub async fn upload_avatar(&self, id: &AccountId, resource: Resource) -> IdentityResult<Account> {
        let account = self.find(id).await?;
        let previous = account.avatar_url().map(str::to_string);

        let key = self.avatars.save(id, resource).await?;
        let account = account.change_avatar_url(Some(key.clone()));
        if let Err(error) = account.validate(&mut FailFastHandler) {
            self.avatars.delete(&key).await?;
            return Err(error.into());
        }

        let updated = self.store(Recorded::unchanged(account)).await?;
        if let Some(previous) = previous {
            self.avatars.delete(&previous).await?;
        }
        Ok(updated)
    }

    /// Check credentials of a confirmed account
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> IdentityResult<Either<Notification, Account>> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            tracing::info!("Authentication failed: unknown email");
            return rejected(INVALID_CREDENTIALS);
        };

        if !self.encrypter.matches(password, account.password()) {
            tracing::info!(account_id = %account.id(), "Authentication failed: wrong password");
            return rejected(INVALID_CREDENTIALS);
        }
        if !account.is_confirmed() {
            return rejected(ACCOUNT_NOT_CONFIRMED);
        }

        Ok(Either::right(account))
    }

    /// Delete an account with its avatar and pending mails; unknown ids are
    /// ignored
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &AccountId) -> IdentityResult<()> {
        let Some(account) = self.accounts.find_by_id(id).await? else {
            tracing::debug!(account_id = %id, "Account already absent");
            return Ok(());
        };

        if let Some(key) = account.avatar_url() {
            self.avatars.delete(key).await?;
        }
        for mail in self.mails.find_all_by_account_id(id).await? {
            self.mails.delete_by_id(mail.id()).await?;
        }

        self.accounts.delete_by_id(id).await?;
        self.evict(id).await;

        let deleted = AccountEvent::Deleted {
            account_id: id.clone(),
            occurred_on: Utc::now(),
        };
        self.publish(&[deleted]).await?;

        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// The stored account, bypassing the cache.
    async fn find(&self, id: &AccountId) -> IdentityResult<Account> {
        Ok(self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| NotFound::with_id("Account", id))?)
    }

    /// The role with `role_id`, or the default role when none is given.
    async fn resolve_role(&self, role_id: Option<&RoleId>) -> IdentityResult<Role> {
        let role = match role_id {
            Some(role_id) => self
                .roles
                .find_by_id(role_id)
                .await?
                .ok_or_else(|| NotFound::with_id("Role", role_id))?,
            None => self
                .roles
                .find_default_role()
                .await?
                .ok_or_else(|| NotFound::with_key("Role", "isDefault", "true"))?,
        };
        Ok(role)
    }

    async fn store(&self, recorded: Recorded<Account>) -> IdentityResult<Account> {
        let (account, events) = recorded.into_parts();

        let updated = self.accounts.update(account).await?;
        self.evict(updated.id()).await;
        self.publish(&events).await?;
        Ok(updated)
    }

    async fn evict(&self, id: &AccountId) {
        if let Err(error) = self.cache.delete(id.value()).await {
            tracing::warn!(account_id = %id, error = %error, "Failed to evict cached account");
        }
    }

    async fn publish(&self, events: &[AccountEvent]) -> IdentityResult<()> {
        publish(
            self.queue.as_ref(),
            &self.config.events_queue,
            events,
            AccountEvent::name,
        )
        .await
    }
}
