//! Integration tests for the Identity domain
//!
//! These tests drive the services over the in-memory gateways to ensure:
//! - Validation failures never reach storage
//! - Business rules (default role, unique e-mail) are enforced
//! - Mailed tokens are single-outstanding, single-use and expire lazily
//! - Account deletion cascades to avatars, tokens and the cache

use chrono::{Duration, Utc};
use core_config::{tracing::init_tracing, Environment};
use core_domain::{Direction, Entity, SearchQuery, ValidationHandler};
use domain_identity::gateway::{
    AccountMailGateway, AvatarGateway, InMemoryGateways, PermissionGateway,
};
use domain_identity::models::{CreateAccount, CreatePermission, CreateRole, Resource, UpdateRole};
use domain_identity::*;
use test_utils::{assertions::*, TestDataBuilder};

struct Harness {
    store: InMemoryGateways,
    permissions: PermissionService,
    roles: RoleService,
    accounts: AccountService,
    mails: AccountMailService,
    codes: AccountCodeService,
}

impl Harness {
    fn new() -> Self {
        init_tracing(&Environment::Development);

        let store = InMemoryGateways::new();
        let gateways = store.gateways();
        let config = IdentityConfig::default();

        Self {
            permissions: PermissionService::new(&gateways),
            roles: RoleService::new(&gateways),
            accounts: AccountService::new(&gateways, config.clone()),
            mails: AccountMailService::new(&gateways, config),
            codes: AccountCodeService::new(&gateways),
            store,
        }
    }

    async fn default_role(&self) -> Role {
        let created = self
            .roles
            .create(CreateRole {
                name: "customer".to_string(),
                description: Some("Assigned to new accounts".to_string()),
                role_type: RoleType::Common,
                is_default: true,
                permission_ids: Vec::new(),
            })
            .await
            .unwrap();
        created.into_right().unwrap()
    }

    async fn account(&self, builder: &TestDataBuilder) -> Account {
        let created = self
            .accounts
            .create(CreateAccount {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: builder.email("ada"),
                password: builder.password(),
                role_id: None,
            })
            .await
            .unwrap();
        created.into_right().unwrap()
    }

    async fn tokens(&self, account: &Account, mail_type: AccountMailType) -> Vec<AccountMail> {
        self.store
            .mails
            .find_all_by_account_id(account.id())
            .await
            .unwrap()
            .into_iter()
            .filter(|m| m.mail_type() == mail_type)
            .collect()
    }
}

// ============================================================================
// Permission / Role Tests
// ============================================================================

#[tokio::test]
async fn test_create_permission_reaches_gateway() {
    let harness = Harness::new();

    let result = harness
        .permissions
        .create(CreatePermission {
            name: "create-role".to_string(),
            description: Some("Create a new role".to_string()),
        })
        .await
        .unwrap();
    let created = result.into_right().unwrap();

    let stored = harness
        .store
        .permissions
        .find_by_id(created.id())
        .await
        .unwrap();
    let stored = assert_some(stored, "permission should be stored");

    assert_eq!(stored.name(), "create-role");
    assert_eq!(stored.description(), Some("Create a new role"));
    assert_eq!(stored.created_at(), stored.updated_at());
}

#[tokio::test]
async fn test_invalid_permission_is_not_stored() {
    let harness = Harness::new();

    let result = harness
        .permissions
        .create(CreatePermission {
            name: "".to_string(),
            description: None,
        })
        .await
        .unwrap();

    assert_error_messages(
        result.get_left().unwrap().errors(),
        &["'name' should not be null or blank"],
    );
    let page = harness.permissions.list(SearchQuery::default()).await.unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_padded_names_collide_with_trimmed_names() {
    let harness = Harness::new();

    let first = harness
        .permissions
        .create(CreatePermission {
            name: " read".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let second = harness
        .permissions
        .create(CreatePermission {
            name: "read".to_string(),
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(first.get_right().unwrap().name(), "read");
    assert_error_messages(
        second.get_left().unwrap().errors(),
        &["Permission already exists"],
    );

    let staff = |name: &str| CreateRole {
        name: name.to_string(),
        description: None,
        role_type: RoleType::Employees,
        is_default: false,
        permission_ids: Vec::new(),
    };
    harness.roles.create(staff("staff ")).await.unwrap().into_right().unwrap();
    let duplicate = harness.roles.create(staff("staff")).await.unwrap();
    assert_error_messages(duplicate.get_left().unwrap().errors(), &["Role already exists"]);

    let permissions = harness.permissions.list(SearchQuery::default()).await.unwrap();
    let roles = harness.roles.list(SearchQuery::default()).await.unwrap();
    assert_eq!(permissions.total_items, 1);
    assert_eq!(roles.total_items, 1);
}

#[tokio::test]
async fn test_only_one_default_role() {
    let harness = Harness::new();
    let customer = harness.default_role().await;

    let second_default = harness
        .roles
        .create(CreateRole {
            name: "guest".to_string(),
            description: None,
            role_type: RoleType::Common,
            is_default: true,
            permission_ids: Vec::new(),
        })
        .await
        .unwrap();
    assert_error_messages(
        second_default.get_left().unwrap().errors(),
        &["Default role already exists"],
    );

    let staff = harness
        .roles
        .create(CreateRole {
            name: "staff".to_string(),
            description: None,
            role_type: RoleType::Employees,
            is_default: false,
            permission_ids: Vec::new(),
        })
        .await
        .unwrap()
        .into_right()
        .unwrap();

    let promote = harness
        .roles
        .update(
            staff.id(),
            UpdateRole {
                name: "staff".to_string(),
                description: None,
                role_type: RoleType::Employees,
                is_default: true,
                permission_ids: Vec::new(),
            },
        )
        .await
        .unwrap();
    assert_error_messages(
        promote.get_left().unwrap().errors(),
        &["Default role already exists"],
    );

    let page = harness
        .roles
        .list(SearchQuery::default().sorted_by("name", Direction::Asc))
        .await
        .unwrap();
    let names: Vec<&str> = page.items.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["customer", "staff"]);
    assert!(page.items.iter().any(|r| r == &customer && r.is_default()));
}

#[tokio::test]
async fn test_role_permissions_are_value_copies() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("role_permissions");

    let read = harness
        .permissions
        .create(CreatePermission {
            name: builder.name("perm", "read"),
            description: None,
        })
        .await
        .unwrap()
        .into_right()
        .unwrap();
    let write = harness
        .permissions
        .create(CreatePermission {
            name: builder.name("perm", "write"),
            description: None,
        })
        .await
        .unwrap()
        .into_right()
        .unwrap();

    let editor = harness
        .roles
        .create(CreateRole {
            name: builder.name("role", "editor"),
            description: None,
            role_type: RoleType::Employees,
            is_default: false,
            permission_ids: vec![read.id().clone()],
        })
        .await
        .unwrap()
        .into_right()
        .unwrap();

    let editor = harness
        .roles
        .add_permissions(editor.id(), &[read.id().clone(), write.id().clone()])
        .await
        .unwrap();
    assert_eq!(editor.permissions().len(), 2);
    assert!(editor.has_permission(write.name()));

    let editor = harness
        .roles
        .remove_permission(editor.id(), read.id())
        .await
        .unwrap();
    assert_eq!(editor.permissions().len(), 1);

    // deleting the permission leaves the copy on the role
    harness.permissions.delete(write.id()).await.unwrap();
    let editor = harness.roles.get(editor.id()).await.unwrap();
    assert!(editor.has_permission(write.name()));
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_create_account_issues_confirmation_mail() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("create_account");
    harness.default_role().await;

    let account = harness.account(&builder).await;

    assert_eq!(account.role().name(), "customer");
    assert_eq!(account.mail_status(), MailStatus::WaitingConfirmation);
    assert_ne!(account.password(), builder.password());

    let tokens = harness
        .tokens(&account, AccountMailType::AccountConfirmation)
        .await;
    assert_eq!(tokens.len(), 1);

    let mail_messages = harness.store.queue.sent_to("account.mail").await;
    assert_eq!(mail_messages.len(), 1);
    assert_eq!(mail_messages[0].payload["token"], tokens[0].token());
    assert_eq!(mail_messages[0].payload["email"], account.email());

    let events = harness.store.queue.sent_to("account.events").await;
    assert_eq!(events[0].kind, "account.created");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("duplicate_email");
    harness.default_role().await;
    let account = harness.account(&builder).await;

    let result = harness
        .accounts
        .create(CreateAccount {
            first_name: "Someone".to_string(),
            last_name: "Else".to_string(),
            email: account.email().to_uppercase(),
            password: builder.password(),
            role_id: None,
        })
        .await
        .unwrap();

    assert_error_messages(result.get_left().unwrap().errors(), &["Email already exists"]);
}

#[tokio::test]
async fn test_reissuing_keeps_single_token_per_type() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("reissue");
    harness.default_role().await;
    let account = harness.account(&builder).await;
    let first = harness
        .tokens(&account, AccountMailType::AccountConfirmation)
        .await;

    harness
        .mails
        .issue(account.id(), AccountMailType::PasswordReset)
        .await
        .unwrap();
    let reissued = harness
        .mails
        .issue(account.id(), AccountMailType::AccountConfirmation)
        .await
        .unwrap()
        .into_right()
        .unwrap();

    let confirmations = harness
        .tokens(&account, AccountMailType::AccountConfirmation)
        .await;
    assert_eq!(confirmations, vec![reissued]);
    assert_ne!(confirmations[0].token(), first[0].token());
    assert_eq!(
        harness.tokens(&account, AccountMailType::PasswordReset).await.len(),
        1
    );
}

#[tokio::test]
async fn test_confirmation_token_is_single_use() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("single_use");
    harness.default_role().await;
    let account = harness.account(&builder).await;
    let token = harness
        .tokens(&account, AccountMailType::AccountConfirmation)
        .await[0]
        .token()
        .to_string();

    let confirmed = harness
        .mails
        .confirm_account(&token)
        .await
        .unwrap()
        .into_right()
        .unwrap();
    assert!(confirmed.is_confirmed());
    assert!(harness.accounts.get(account.id()).await.unwrap().is_confirmed());

    let second = harness.mails.confirm_account(&token).await.unwrap_err();
    assert!(second.is_not_found());
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_kept() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("expired");
    harness.default_role().await;
    let account = harness.account(&builder).await;

    let token = builder.token("expired");
    let issued_at = Utc::now() - Duration::hours(1);
    let expired = AccountMail::with(
        AccountMailId::unique(),
        token.clone(),
        AccountMailType::PasswordReset,
        account.clone(),
        Utc::now() - Duration::minutes(1),
        issued_at,
        issued_at,
    );
    harness.store.mails.create(expired).await.unwrap();

    let result = harness
        .mails
        .reset_password(&token, "brand-new-pass")
        .await
        .unwrap();

    assert_error_messages(result.get_left().unwrap().errors(), &["Token expired"]);
    let still_there = harness.store.mails.find_by_token(&token).await.unwrap();
    assert_some(still_there, "expired token must not be deleted");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("password_reset");
    harness.default_role().await;
    let account = harness.account(&builder).await;

    let confirmation = harness
        .tokens(&account, AccountMailType::AccountConfirmation)
        .await[0]
        .token()
        .to_string();
    harness.mails.confirm_account(&confirmation).await.unwrap();

    let mail = harness
        .mails
        .request_password_reset(account.email())
        .await
        .unwrap()
        .into_right()
        .unwrap();
    harness
        .mails
        .reset_password(mail.token(), "brand-new-pass")
        .await
        .unwrap()
        .into_right()
        .unwrap();

    let old = harness
        .accounts
        .authenticate(account.email(), &builder.password())
        .await
        .unwrap();
    assert_error_messages(old.get_left().unwrap().errors(), &["Invalid credentials"]);

    let new = harness
        .accounts
        .authenticate(account.email(), "brand-new-pass")
        .await
        .unwrap();
    assert_eq!(new.get_right().unwrap().id(), account.id());
}

#[tokio::test]
async fn test_avatar_upload_replaces_previous_object() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("avatar");
    harness.default_role().await;
    let account = harness.account(&builder).await;

    let first = harness
        .accounts
        .upload_avatar(account.id(), Resource::new("a.png", "image/png", vec![1]))
        .await
        .unwrap();
    let second = harness
        .accounts
        .upload_avatar(account.id(), Resource::new("b.png", "image/png", vec![2]))
        .await
        .unwrap();

    let first_key = assert_some(first.avatar_url(), "first avatar key");
    let second_key = assert_some(second.avatar_url(), "second avatar key");
    assert_ne!(first_key, second_key);
    assert_eq!(harness.store.avatars.len().await, 1);

    let stored = harness
        .store
        .avatars
        .find_avatar_by_key(second_key)
        .await
        .unwrap();
    assert_eq!(assert_some(stored, "avatar object").file_name, "b.png");
}

#[tokio::test]
async fn test_delete_account_cascades() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("delete_account");
    harness.default_role().await;
    let account = harness.account(&builder).await;

    harness
        .accounts
        .upload_avatar(account.id(), Resource::new("a.png", "image/png", vec![1]))
        .await
        .unwrap();
    harness.accounts.get(account.id()).await.unwrap();
    assert!(harness.store.cache.contains(account.id().as_ref()).await);

    harness.accounts.delete(account.id()).await.unwrap();

    assert!(harness.store.avatars.is_empty().await);
    assert!(!harness.store.cache.contains(account.id().as_ref()).await);
    assert!(
        harness
            .tokens(&account, AccountMailType::AccountConfirmation)
            .await
            .is_empty()
    );
    assert!(harness.accounts.get(account.id()).await.unwrap_err().is_not_found());

    let events = harness.store.queue.sent_to("account.events").await;
    assert_eq!(events.last().map(|m| m.kind.as_str()), Some("account.deleted"));

    // deleting again is a no-op
    harness.accounts.delete(account.id()).await.unwrap();
}

#[tokio::test]
async fn test_account_code_for_existing_account() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("account_code");
    harness.default_role().await;
    let account = harness.account(&builder).await;

    let code = harness
        .codes
        .create(account.id(), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM")
        .await
        .unwrap()
        .into_right()
        .unwrap();

    let stored = harness.store.codes.find_by_code(code.code()).await;
    assert_eq!(assert_some(stored, "stored code").account_id(), account.id());
}
