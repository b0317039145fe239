//! Identity Domain
//!
//! Accounts, role-based permissions and mailed single-use tokens.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Use cases, business rules, Either<Notification, T>
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Aggregates  │  ← Permission, Role, Account, AccountMail, AccountCode
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Gateways   │  ← Storage, hashing, avatars, queue, cache (trait + in-memory)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_identity::{
//!     gateway::InMemoryGateways, models::CreatePermission, IdentityConfig, PermissionService,
//! };
//!
//! # async fn run() -> domain_identity::IdentityResult<()> {
//! let store = InMemoryGateways::new();
//! let permissions = PermissionService::new(&store.gateways());
//!
//! let created = permissions
//!     .create(CreatePermission {
//!         name: "create-role".to_string(),
//!         description: Some("Create a new role".to_string()),
//!     })
//!     .await?;
//! assert!(created.is_right());
//! # let _ = IdentityConfig::default();
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod account_code;
pub mod account_mail;
pub mod config;
pub mod encrypter;
pub mod error;
pub mod gateway;
pub mod models;
pub mod permission;
pub mod role;
pub mod service;

// Re-export commonly used types
pub use account::{Account, AccountEvent, AccountId, MailStatus};
pub use account_code::{AccountCode, AccountCodeId};
pub use account_mail::{AccountMail, AccountMailEvent, AccountMailId, AccountMailType};
pub use config::IdentityConfig;
pub use encrypter::Argon2Encrypter;
pub use error::{IdentityError, IdentityResult};
pub use gateway::Gateways;
pub use permission::{Permission, PermissionId};
pub use role::{Role, RoleId, RolePermission, RoleType};
pub use service::{
    AccountCodeService, AccountMailService, AccountService, PermissionService, RoleService,
};
