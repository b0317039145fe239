use core_domain::{constraints, DomainResult, ValidationHandler, Validator};

use super::Role;

const NAME_MIN_LENGTH: usize = 3;
const NAME_MAX_LENGTH: usize = 50;
const DESCRIPTION_MAX_LENGTH: usize = 255;

pub struct RoleValidator<'a, H: ValidationHandler> {
    role: &'a Role,
    handler: &'a mut H,
}

impl<'a, H: ValidationHandler> RoleValidator<'a, H> {
    pub fn new(role: &'a Role, handler: &'a mut H) -> Self {
        Self { role, handler }
    }

    fn check_name(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::required_text(
            "name",
            &self.role.name,
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
        ))?;
        Ok(())
    }

    fn check_description(&mut self) -> DomainResult<()> {
        self.handler.check(constraints::optional_text(
            "description",
            self.role.description.as_deref(),
            DESCRIPTION_MAX_LENGTH,
        ))?;
        Ok(())
    }

    // Permission names are copies; a blank one means the copy went wrong.
    fn check_permissions(&mut self) -> DomainResult<()> {
        for permission in &self.role.permissions {
            if permission.permission_name.trim().is_empty() {
                self.handler.append(constraints::blank("permissions"))?;
                return Ok(());
            }
        }
        Ok(())
    }
}

impl<H: ValidationHandler> Validator for RoleValidator<'_, H> {
    fn validate(&mut self) -> DomainResult<()> {
        self.check_name()?;
        self.check_description()?;
        self.check_permissions()
    }
}
