use chrono::Utc;
use core_domain::{constraints, DomainResult, Entity, ValidationHandler, Validator};

use super::AccountMail;

const TOKEN_MAX_LENGTH: usize = 36;

pub struct AccountMailValidator<'a, H: ValidationHandler> {
    mail: &'a AccountMail,
    handler: &'a mut H,
}

impl<'a, H: ValidationHandler> AccountMailValidator<'a, H> {
    pub fn new(mail: &'a AccountMail, handler: &'a mut H) -> Self {
        Self { mail, handler }
    }

    fn check_token(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::required_text(
            "token",
            &self.mail.token,
            1,
            TOKEN_MAX_LENGTH,
        ))?;
        Ok(())
    }

    fn check_account(&mut self) -> DomainResult<()> {
        self.handler
            .check(constraints::required_reference("account", self.mail.account.id()))?;
        Ok(())
    }

    fn check_expires_at(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::not_before_now(
            "expiresAt",
            self.mail.expires_at,
            Utc::now(),
        ))?;
        Ok(())
    }
}

impl<H: ValidationHandler> Validator for AccountMailValidator<'_, H> {
    fn validate(&mut self) -> DomainResult<()> {
        self.check_token()?;
        self.check_account()?;
        self.check_expires_at()
    }
}
