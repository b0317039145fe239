//! Use cases.
//!
//! Flows that report every problem at once return
//! `IdentityResult<Either<Notification, T>>`: `Left` carries the collected
//! violations and nothing was written. Not-found, gateway failures and
//! fail-fast violations are raised through the outer `Result`.

mod account;
mod account_code;
mod account_mail;
mod permission;
mod role;

use core_domain::{Either, Entity, Error, Notification};
use serde::Serialize;

use crate::error::IdentityResult;
use crate::gateway::QueueGateway;
use crate::models::QueueMessage;

pub use account::AccountService;
pub use account_code::AccountCodeService;
pub use account_mail::AccountMailService;
pub use permission::PermissionService;
pub use role::RoleService;

pub const EMAIL_ALREADY_EXISTS: &str = "Email already exists";
pub const DEFAULT_ROLE_ALREADY_EXISTS: &str = "Default role already exists";
pub const ROLE_ALREADY_EXISTS: &str = "Role already exists";
pub const PERMISSION_ALREADY_EXISTS: &str = "Permission already exists";
pub const TOKEN_EXPIRED: &str = "Token expired";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ACCOUNT_NOT_CONFIRMED: &str = "Account not confirmed";

/// Run `aggregate`'s checks, collecting every violation.
fn collect<E: Entity>(aggregate: &E) -> IdentityResult<Notification> {
    let mut notification = Notification::create();
    aggregate.validate(&mut notification)?;
    Ok(notification)
}

/// A `Left` carrying a single business-rule error.
fn rejected<T>(message: &str) -> IdentityResult<Either<Notification, T>> {
    Ok(Either::left(Notification::with_error(Error::new(message))))
}

/// Publish `events` to `queue`, one message each, in order.
async fn publish<E, F>(
    gateway: &dyn QueueGateway,
    queue: &str,
    events: &[E],
    kind: F,
) -> IdentityResult<()>
where
    E: Serialize + Sync,
    F: Fn(&E) -> &'static str,
{
    for event in events {
        let message = QueueMessage::new(queue, kind(event), event)?;
        gateway.send(message).await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use crate::account::Account;
    use crate::gateway::{
        Gateways, InMemoryCacheGateway, MockAccountCodeGateway, MockAccountGateway,
        MockAccountMailGateway, MockAvatarGateway, MockEncrypterGateway, MockPermissionGateway,
        MockQueueGateway, MockRoleGateway,
    };
    use crate::role::{Role, RoleType};

    /// Mocks for every gateway; any call without an expectation panics.
    #[derive(Default)]
    pub struct Mocks {
        pub accounts: MockAccountGateway,
        pub roles: MockRoleGateway,
        pub permissions: MockPermissionGateway,
        pub mails: MockAccountMailGateway,
        pub codes: MockAccountCodeGateway,
        pub encrypter: MockEncrypterGateway,
        pub avatars: MockAvatarGateway,
        pub queue: MockQueueGateway,
    }

    impl Mocks {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_gateways(self) -> Gateways {
            Gateways {
                accounts: Arc::new(self.accounts),
                roles: Arc::new(self.roles),
                permissions: Arc::new(self.permissions),
                mails: Arc::new(self.mails),
                codes: Arc::new(self.codes),
                encrypter: Arc::new(self.encrypter),
                avatars: Arc::new(self.avatars),
                queue: Arc::new(self.queue),
                cache: Arc::new(InMemoryCacheGateway::<Account>::new()),
            }
        }
    }

    pub fn customer_role() -> Role {
        Role::new_role("customer", None, RoleType::Common, true, [])
    }

    pub fn stored_account() -> Account {
        Account::new_account(
            "Ada",
            "Lovelace",
            "ada@example.com",
            "$argon2id$stored-hash",
            customer_role(),
        )
        .into_aggregate()
    }
}
