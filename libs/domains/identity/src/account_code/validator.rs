use core_domain::{constraints, DomainResult, ValidationHandler, Validator};

use super::AccountCode;

const CODE_MAX_LENGTH: usize = 36;
const CODE_CHALLENGE_MAX_LENGTH: usize = 100;

pub struct AccountCodeValidator<'a, H: ValidationHandler> {
    code: &'a AccountCode,
    handler: &'a mut H,
}

impl<'a, H: ValidationHandler> AccountCodeValidator<'a, H> {
    pub fn new(code: &'a AccountCode, handler: &'a mut H) -> Self {
        Self { code, handler }
    }
}

impl<H: ValidationHandler> Validator for AccountCodeValidator<'_, H> {
    fn validate(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::required_text(
            "code",
            &self.code.code,
            1,
            CODE_MAX_LENGTH,
        ))?;
        self.handler.check(constraints::required_text(
            "codeChallenge",
            &self.code.code_challenge,
            1,
            CODE_CHALLENGE_MAX_LENGTH,
        ))?;
        self.handler.check(constraints::required_reference(
            "accountId",
            &self.code.account_id,
        ))?;
        Ok(())
    }
}
