use chrono::Duration;
use core_config::{env_or_default, env_parse, ConfigError, FromEnv};

use crate::account_mail::AccountMailType;

/// Token lifetimes and queue names used by the identity services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityConfig {
    pub account_confirmation_ttl: Duration,
    pub password_reset_ttl: Duration,
    pub mail_queue: String,
    pub events_queue: String,
}

impl IdentityConfig {
    /// Lifetime of a freshly issued token of `mail_type`.
    pub fn ttl_for(&self, mail_type: AccountMailType) -> Duration {
        match mail_type {
            AccountMailType::AccountConfirmation => self.account_confirmation_ttl,
            AccountMailType::PasswordReset => self.password_reset_ttl,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            account_confirmation_ttl: Duration::minutes(1440),
            password_reset_ttl: Duration::minutes(30),
            mail_queue: "account.mail".to_string(),
            events_queue: "account.events".to_string(),
        }
    }
}

fn ttl_minutes(key: &str, default: i64) -> Result<Duration, ConfigError> {
    let minutes = env_parse(key, default)?;
    if minutes <= 0 {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!("expected a positive number of minutes, got {minutes}"),
        });
    }
    Ok(Duration::minutes(minutes))
}

impl FromEnv for IdentityConfig {
    /// Reads from environment variables with sensible defaults:
    /// - ACCOUNT_CONFIRMATION_TTL_MINUTES: defaults to 1440 (one day)
    /// - PASSWORD_RESET_TTL_MINUTES: defaults to 30
    /// - MAIL_QUEUE: defaults to "account.mail"
    /// - EVENTS_QUEUE: defaults to "account.events"
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account_confirmation_ttl: ttl_minutes("ACCOUNT_CONFIRMATION_TTL_MINUTES", 1440)?,
            password_reset_ttl: ttl_minutes("PASSWORD_RESET_TTL_MINUTES", 30)?,
            mail_queue: env_or_default("MAIL_QUEUE", "account.mail"),
            events_queue: env_or_default("EVENTS_QUEUE", "account.events"),
        })
    }
}
