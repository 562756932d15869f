//! Credential resolution for storage uploads.
//!
//! Credential lookup is a collaborator injected at publisher construction
//! rather than an ambient environment read buried inside the publisher.
//! This keeps the presence check at the composition root and lets tests
//! supply fake or missing credentials without mutating process state.
//!
//! The resolved values are opaque to this crate; they are handed to the
//! storage client as-is.

use crate::constants::{ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY};
use crate::error::{PublishError, Result};

/// A validated credential pair for the storage provider.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Supplies validated storage credentials at publisher construction.
///
/// Resolution must fail fast with a [`PublishError::Configuration`] that
/// names the missing piece, before any network activity happens.
pub trait CredentialProvider {
    fn resolve(&self) -> Result<ResolvedCredentials>;
}

/// Resolves credentials from the standard environment variables.
///
/// Both `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` must be present
/// and non-blank. A missing or blank variable fails resolution with an
/// error naming that specific variable.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn resolve(&self) -> Result<ResolvedCredentials> {
        Ok(ResolvedCredentials {
            access_key_id: require_non_blank(ENV_ACCESS_KEY_ID)?,
            secret_access_key: require_non_blank(ENV_SECRET_ACCESS_KEY)?,
        })
    }
}

/// Fixed credentials, mainly useful for tests and embedded configuration.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: ResolvedCredentials,
}

impl StaticCredentialProvider {
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        StaticCredentialProvider {
            credentials: ResolvedCredentials {
                access_key_id: access_key_id.to_string(),
                secret_access_key: secret_access_key.to_string(),
            },
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn resolve(&self) -> Result<ResolvedCredentials> {
        Ok(self.credentials.clone())
    }
}

fn require_non_blank(variable: &str) -> Result<String> {
    match std::env::var(variable) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PublishError::missing_env(variable)),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    // Environment mutation is process-wide, so these tests use variable
    // names unique to each test instead of the real AWS names.

    #[test]
    fn test_require_non_blank_present() {
        env::set_var("PUBLISHER_TEST_KEY_A", "AKIAEXAMPLE");
        assert_eq!(
            require_non_blank("PUBLISHER_TEST_KEY_A").unwrap(),
            "AKIAEXAMPLE"
        );
        env::remove_var("PUBLISHER_TEST_KEY_A");
    }

    #[test]
    fn test_require_non_blank_missing() {
        env::remove_var("PUBLISHER_TEST_KEY_B");
        let err = require_non_blank("PUBLISHER_TEST_KEY_B").unwrap_err();
        assert_eq!(err.to_string(), "Env PUBLISHER_TEST_KEY_B is not set");
    }

    #[test]
    fn test_require_non_blank_whitespace_only() {
        env::set_var("PUBLISHER_TEST_KEY_C", "   ");
        let err = require_non_blank("PUBLISHER_TEST_KEY_C").unwrap_err();
        assert_eq!(err.to_string(), "Env PUBLISHER_TEST_KEY_C is not set");
        env::remove_var("PUBLISHER_TEST_KEY_C");
    }

    #[test]
    fn test_static_provider_resolves_injected_values() {
        let provider = StaticCredentialProvider::new("key-id", "secret");
        let creds = provider.resolve().unwrap();
        assert_eq!(creds.access_key_id, "key-id");
        assert_eq!(creds.secret_access_key, "secret");
    }
}
