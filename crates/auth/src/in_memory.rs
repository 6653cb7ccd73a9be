use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use invoicedash_core::{Entity, UserId};

use crate::credentials::{AuthErrorKind, CREDENTIALS_PROVIDER, CredentialVerifier, Credentials, VerifyError};
use crate::user::User;

/// In-memory user directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialVerifier {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.insert(user);
        self
    }

    pub fn insert(&self, user: User) {
        if let Ok(mut users) = self.users.write() {
            users.insert(user.email.to_lowercase(), user);
        }
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentialVerifier {
    async fn verify(&self, provider: &str, credentials: &Credentials) -> Result<UserId, VerifyError> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(VerifyError::Auth(AuthErrorKind::Configuration));
        }
        if !credentials.is_well_formed() {
            return Err(VerifyError::Auth(AuthErrorKind::CredentialsSignin));
        }

        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user directory lock poisoned"))?;

        match users.get(&credentials.email.trim().to_lowercase()) {
            Some(user) if user.verify_password(&credentials.password) => Ok(user.key()),
            _ => {
                tracing::debug!(email = %credentials.email, "credentials rejected");
                Err(VerifyError::Auth(AuthErrorKind::CredentialsSignin))
            }
        }
    }
}
