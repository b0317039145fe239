use core_domain::{constraints, DomainResult, ValidationHandler, Validator};

use super::Permission;

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 255;

pub struct PermissionValidator<'a, H: ValidationHandler> {
    permission: &'a Permission,
    handler: &'a mut H,
}

impl<'a, H: ValidationHandler> PermissionValidator<'a, H> {
    pub fn new(permission: &'a Permission, handler: &'a mut H) -> Self {
        Self {
            permission,
            handler,
        }
    }

    fn check_name(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::required_text(
            "name",
            &self.permission.name,
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
        ))?;
        Ok(())
    }

    fn check_description(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::optional_text(
            "description",
            self.permission.description.as_deref(),
            DESCRIPTION_MAX_LENGTH,
        ))?;
        Ok(())
    }
}

impl<H: ValidationHandler> Validator for PermissionValidator<'_, H> {
    fn validate(&mut self) -> DomainResult<()> {
        self.check_name()?;
        self.check_description()
    }
}
