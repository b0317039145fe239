use serde::{Deserialize, Serialize};

use crate::error::IdentityResult;
use crate::permission::PermissionId;
use crate::role::{RoleId, RoleType};

/// Input for creating a permission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
    pub role_type: RoleType,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub permission_ids: Vec<PermissionId>,
}

/// Input for replacing a role's attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRole {
    pub name: String,
    pub description: Option<String>,
    pub role_type: RoleType,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub permission_ids: Vec<PermissionId>,
}

/// Input for creating an account
///
/// Without `role_id` the account gets the default role.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_id: Option<RoleId>,
}

impl std::fmt::Debug for CreateAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccount")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// Binary object handed to the avatar storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Resource {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

/// Message published through the queue gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    pub queue: String,
    pub kind: String,
    pub payload: serde_json::Value,
}

impl QueueMessage {
    pub fn new<T: Serialize>(
        queue: impl Into<String>,
        kind: impl Into<String>,
        payload: &T,
    ) -> IdentityResult<Self> {
        Ok(Self {
            queue: queue.into(),
            kind: kind.into(),
            payload: serde_json::to_value(payload)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_debug_redacts_password() {
        let input = CreateAccount {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "s3cret-pass".into(),
            role_id: None,
        };

        assert!(!format!("{input:?}").contains("s3cret-pass"));
    }

    #[test]
    fn test_queue_message_serializes_payload() {
        let message = QueueMessage::new("account.mail", "ping", &vec!["a", "b"]).unwrap();

        assert_eq!(message.queue, "account.mail");
        assert_eq!(message.payload, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_create_role_defaults() {
        let input: CreateRole =
            serde_json::from_str(r#"{"name":"admin","description":null,"role_type":"EMPLOYEES"}"#)
                .unwrap();

        assert!(!input.is_default);
        assert!(input.permission_ids.is_empty());
        assert_eq!(input.role_type, RoleType::Employees);
    }
}
