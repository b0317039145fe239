use std::sync::Arc;

use chrono::Utc;
use core_domain::{
    Either, Entity, FailFastHandler, NotFound, Notification, Recorded, ValidationHandler,
};
use uuid::Uuid;

use super::account::change_password;
use super::{collect, publish, rejected, TOKEN_EXPIRED};
use crate::account::{Account, AccountEvent, AccountId};
use crate::account_mail::{AccountMail, AccountMailEvent, AccountMailType};
use crate::config::IdentityConfig;
use crate::error::IdentityResult;
use crate::gateway::{
    AccountGateway, AccountMailGateway, CacheGateway, EncrypterGateway, Gateways, QueueGateway,
};

/// Issues and consumes mailed tokens
#[derive(Clone)]
pub struct AccountMailService {
    mails: Arc<dyn AccountMailGateway>,
    accounts: Arc<dyn AccountGateway>,
    encrypter: Arc<dyn EncrypterGateway>,
    queue: Arc<dyn QueueGateway>,
    cache: Arc<dyn CacheGateway<Account>>,
    config: IdentityConfig,
}

impl AccountMailService {
    pub fn new(gateways: &Gateways, config: IdentityConfig) -> Self {
        Self {
            mails: gateways.mails.clone(),
            accounts: gateways.accounts.clone(),
            encrypter: gateways.encrypter.clone(),
            queue: gateways.queue.clone(),
            cache: gateways.cache.clone(),
            config,
        }
    }

    /// Issue a fresh token of `mail_type` for an account
    #[tracing::instrument(skip(self))]
    pub async fn issue(
        &self,
        account_id: &AccountId,
        mail_type: AccountMailType,
    ) -> IdentityResult<Either<Notification, AccountMail>> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| NotFound::with_id("Account", account_id))?;

        self.issue_for(&account, mail_type).await
    }

    /// Issue a PASSWORD_RESET token for the account owning `email`
    #[tracing::instrument(skip(self))]
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> IdentityResult<Either<Notification, AccountMail>> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| NotFound::with_key("Account", "email", email))?;

        self.issue_for(&account, AccountMailType::PasswordReset).await
    }

    /// Build, validate and store a token, replacing any outstanding token of
    /// the same type, then ask for the mail to be sent.
    pub(crate) async fn issue_for(
        &self,
        account: &Account,
        mail_type: AccountMailType,
    ) -> IdentityResult<Either<Notification, AccountMail>> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.config.ttl_for(mail_type);
        let (mail, events) =
            AccountMail::new_account_mail(token, mail_type, account.clone(), expires_at)
                .into_parts();

        let notification = collect(&mail)?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        let previous = self.mails.find_all_by_account_id(account.id()).await?;
        for stale in previous.iter().filter(|m| m.mail_type() == mail_type) {
            self.mails.delete_by_id(stale.id()).await?;
            tracing::debug!(mail_id = %stale.id(), "Replaced outstanding token");
        }

        let created = self.mails.create(mail).await?;
        publish(
            self.queue.as_ref(),
            &self.config.mail_queue,
            &events,
            |_: &AccountMailEvent| "account_mail.issued",
        )
        .await?;

        tracing::info!(
            account_id = %account.id(),
            token_type = %mail_type,
            expires_at = %created.expires_at(),
            "Issued account mail"
        );
        Ok(Either::right(created))
    }

    /// Confirm the e-mail address of the account an ACCOUNT_CONFIRMATION
    /// token was issued for
    #[tracing::instrument(skip(self, token))]
    pub async fn confirm_account(
        &self,
        token: &str,
    ) -> IdentityResult<Either<Notification, Account>> {
        let mail = match self
            .live_token(token, AccountMailType::AccountConfirmation)
            .await?
        {
            Either::Left(notification) => return Ok(Either::left(notification)),
            Either::Right(mail) => mail,
        };

        let account = self.owner_of(&mail).await?;
        let recorded = account.confirm();
        recorded.aggregate().validate(&mut FailFastHandler)?;

        let confirmed = self.finish(&mail, recorded).await?;
        tracing::info!(account_id = %confirmed.id(), "Account confirmed");
        Ok(Either::right(confirmed))
    }

    /// Replace the password of the account a PASSWORD_RESET token was
    /// issued for
    #[tracing::instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> IdentityResult<Either<Notification, Account>> {
        let mail = match self.live_token(token, AccountMailType::PasswordReset).await? {
            Either::Left(notification) => return Ok(Either::left(notification)),
            Either::Right(mail) => mail,
        };

        let account = self.owner_of(&mail).await?;
        let recorded = match change_password(account, new_password, self.encrypter.as_ref())? {
            Either::Left(notification) => return Ok(Either::left(notification)),
            Either::Right(recorded) => recorded,
        };

        let updated = self.finish(&mail, recorded).await?;
        tracing::info!(account_id = %updated.id(), "Password reset");
        Ok(Either::right(updated))
    }

    /// A stored, unexpired token of `mail_type`.
    ///
    /// An unknown token, or one issued for another purpose, is not found. An
    /// expired one is rejected and left in place.
    async fn live_token(
        &self,
        token: &str,
        mail_type: AccountMailType,
    ) -> IdentityResult<Either<Notification, AccountMail>> {
        let mail = self
            .mails
            .find_by_token(token)
            .await?
            .filter(|m| m.mail_type() == mail_type)
            .ok_or_else(|| NotFound::with_key("AccountMail", "token", token))?;

        if mail.is_expired() {
            tracing::info!(mail_id = %mail.id(), token_type = %mail_type, "Rejected expired token");
            return rejected(TOKEN_EXPIRED);
        }
        Ok(Either::right(mail))
    }

    /// Current state of the account the token was issued for.
    async fn owner_of(&self, mail: &AccountMail) -> IdentityResult<Account> {
        let account_id = mail.account().id();
        Ok(self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| NotFound::with_id("Account", account_id))?)
    }

    /// Persist the consumed token's effect, then delete the token.
    async fn finish(
        &self,
        mail: &AccountMail,
        recorded: Recorded<Account>,
    ) -> IdentityResult<Account> {
        let (account, events) = recorded.into_parts();

        let updated = self.accounts.update(account).await?;
        self.mails.delete_by_id(mail.id()).await?;
        if let Err(error) = self.cache.delete(updated.id().as_ref()).await {
            tracing::warn!(account_id = %updated.id(), error = %error, "Failed to evict cached account");
        }

        publish(
            self.queue.as_ref(),
            &self.config.events_queue,
            &events,
            AccountEvent::name,
        )
        .await?;
        Ok(updated)
    }
}
