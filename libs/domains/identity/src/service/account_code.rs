use std::sync::Arc;

use core_domain::{Either, Entity, NotFound, Notification, ValidationHandler};
use uuid::Uuid;

use super::collect;
use crate::account::AccountId;
use crate::account_code::AccountCode;
use crate::error::IdentityResult;
use crate::gateway::{AccountCodeGateway, AccountGateway, Gateways};

/// Issues authorization codes bound to a PKCE code challenge
#[derive(Clone)]
pub struct AccountCodeService {
    codes: Arc<dyn AccountCodeGateway>,
    accounts: Arc<dyn AccountGateway>,
}

impl AccountCodeService {
    pub fn new(gateways: &Gateways) -> Self {
        Self {
            codes: gateways.codes.clone(),
            accounts: gateways.accounts.clone(),
        }
    }

    #[tracing::instrument(skip(self, code_challenge))]
    pub async fn create(
        &self,
        account_id: &AccountId,
        code_challenge: &str,
    ) -> IdentityResult<Either<Notification, AccountCode>> {
        if self.accounts.find_by_id(account_id).await?.is_none() {
            return Err(NotFound::with_id("Account", account_id).into());
        }

        let code = AccountCode::new_account_code(
            Uuid::new_v4().to_string(),
            code_challenge,
            account_id.clone(),
        );

        let notification = collect(&code)?;
        if notification.has_error() {
            return Ok(Either::left(notification));
        }

        let created = self.codes.create(code).await?;
        tracing::info!(code_id = %created.id(), account_id = %account_id, "Account code created");
        Ok(Either::right(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures::{stored_account, Mocks};

    #[tokio::test]
    async fn test_create_code_for_account() {
        let account = stored_account();
        let id = account.id().clone();

        let mut mocks = Mocks::new();
        mocks
            .accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));
        mocks
            .codes
            .expect_create()
            .withf(|c| c.code_challenge() == "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM")
            .times(1)
            .returning(Ok);

        let service = AccountCodeService::new(&mocks.into_gateways());
        let result = service
            .create(&id, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM")
            .await
            .unwrap();

        let code = result.get_right().unwrap();
        assert_eq!(code.account_id(), &id);
        assert_eq!(code.code().len(), 36);
    }

    #[tokio::test]
    async fn test_blank_challenge_is_rejected() {
        let account = stored_account();
        let id = account.id().clone();

        let mut mocks = Mocks::new();
        mocks
            .accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));
        mocks.codes.expect_create().never();

        let service = AccountCodeService::new(&mocks.into_gateways());
        let result = service.create(&id, " ").await.unwrap();

        assert_eq!(
            result.get_left().unwrap().errors()[0].message(),
            "'codeChallenge' should not be null or blank"
        );
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let mut mocks = Mocks::new();
        mocks.accounts.expect_find_by_id().returning(|_| Ok(None));
        mocks.codes.expect_create().never();

        let service = AccountCodeService::new(&mocks.into_gateways());
        let error = service
            .create(&AccountId::from_string("acc-0"), "challenge")
            .await
            .unwrap_err();

        assert!(error.is_not_found());
    }
}
