use core_domain::{constraints, DomainResult, Entity, Error, ValidationHandler, Validator};
use validator::{ValidateEmail, ValidateLength};

use super::Account;

const NAME_MIN_LENGTH: usize = 1;
const NAME_MAX_LENGTH: usize = 50;
const EMAIL_MAX_LENGTH: usize = 255;
const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 255;
const AVATAR_URL_MAX_LENGTH: usize = 255;

pub struct AccountValidator<'a, H: ValidationHandler> {
    account: &'a Account,
    handler: &'a mut H,
}

impl<'a, H: ValidationHandler> AccountValidator<'a, H> {
    pub fn new(account: &'a Account, handler: &'a mut H) -> Self {
        Self { account, handler }
    }

    fn check_names(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::required_text(
            "firstName",
            &self.account.first_name,
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
        ))?;
        self.handler.check(constraints::required_text(
            "lastName",
            &self.account.last_name,
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
        ))?;
        Ok(())
    }

    fn check_email(&mut self) -> DomainResult<()> {
        let email = &self.account.email;
        if let Some(violation) =
            constraints::required_text("email", email, 1, EMAIL_MAX_LENGTH)
        {
            self.handler.append(violation)?;
            return Ok(());
        }

        if !email.validate_email() {
            self.handler
                .append(Error::new("'email' should be a valid email"))?;
        }
        Ok(())
    }

    /// Measured as typed: the raw value is what gets hashed.
    fn check_password(&mut self) -> DomainResult<()> {
        let password = &self.account.password;
        if password.trim().is_empty() {
            self.handler.append(constraints::blank("password"))?;
        } else if !password.validate_length(
            Some(PASSWORD_MIN_LENGTH as u64),
            Some(PASSWORD_MAX_LENGTH as u64),
            None,
        ) {
            self.handler.append(constraints::length(
                "password",
                PASSWORD_MIN_LENGTH,
                PASSWORD_MAX_LENGTH,
            ))?;
        }
        Ok(())
    }

    fn check_avatar_url(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::optional_text(
            "avatarUrl",
            self.account.avatar_url.as_deref(),
            AVATAR_URL_MAX_LENGTH,
        ))?;
        Ok(())
    }

    fn check_role(&mut self) -> DomainResult<()> {
        self.handler
            .check(constraints::required_reference("role", self.account.role.id()))?;
        Ok(())
    }
}

impl<H: ValidationHandler> Validator for AccountValidator<'_, H> {
    fn validate(&mut self) -> DomainResult<()> {
        self.check_names()?;
        self.check_email()?;
        self.check_password()?;
        self.check_avatar_url()?;
        self.check_role()
    }
}
